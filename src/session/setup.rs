use std::collections::BTreeSet;

use crate::bank::question::Question;
use crate::engine::filter::CategoryFilter;
use crate::session::settings::{QuizMode, QuizSettings};

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 180;

/// One selectable line of the setup screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupRow {
    AllCategories,
    Category(String),
    QuestionCount,
    TimeLimit,
}

pub struct SetupForm {
    pub mode: QuizMode,
    pub categories: Vec<String>,
    pub selected: BTreeSet<String>,
    pub question_count: usize,
    pub time_limit_minutes: u32,
    pub cursor: usize,
}

impl SetupForm {
    pub fn new(
        mode: QuizMode,
        categories: Vec<String>,
        default_count: usize,
        default_minutes: u32,
    ) -> Self {
        Self {
            mode,
            categories,
            selected: BTreeSet::new(),
            question_count: default_count.max(1),
            time_limit_minutes: default_minutes.clamp(MIN_MINUTES, MAX_MINUTES),
            cursor: 0,
        }
    }

    /// Category rows only exist in study mode; exams always draw from the
    /// whole pool.
    pub fn rows(&self) -> Vec<SetupRow> {
        let mut rows = Vec::new();
        if self.mode == QuizMode::Study {
            rows.push(SetupRow::AllCategories);
            rows.extend(self.categories.iter().cloned().map(SetupRow::Category));
        }
        rows.push(SetupRow::QuestionCount);
        rows.push(SetupRow::TimeLimit);
        rows
    }

    pub fn current_row(&self) -> Option<SetupRow> {
        self.rows().into_iter().nth(self.cursor)
    }

    pub fn cursor_down(&mut self) {
        let len = self.rows().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn toggle_category(&mut self, category: &str) {
        if !self.selected.remove(category) {
            self.selected.insert(category.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected.clear();
    }

    /// Space/Enter on the current row.
    pub fn toggle_current(&mut self) {
        match self.current_row() {
            Some(SetupRow::AllCategories) => self.select_all(),
            Some(SetupRow::Category(c)) => self.toggle_category(&c),
            _ => {}
        }
    }

    pub fn increase(&mut self, pool: &[Question]) {
        match self.current_row() {
            Some(SetupRow::QuestionCount) => {
                let max = self.max_questions(pool).max(1);
                self.question_count = (self.effective_count(pool) + 1).min(max);
            }
            Some(SetupRow::TimeLimit) => {
                self.time_limit_minutes = (self.time_limit_minutes + 1).min(MAX_MINUTES);
            }
            _ => {}
        }
    }

    pub fn decrease(&mut self, pool: &[Question]) {
        match self.current_row() {
            Some(SetupRow::QuestionCount) => {
                self.question_count = self.effective_count(pool).saturating_sub(1).max(1);
            }
            Some(SetupRow::TimeLimit) => {
                self.time_limit_minutes = self.time_limit_minutes.saturating_sub(1).max(MIN_MINUTES);
            }
            _ => {}
        }
    }

    pub fn max_questions(&self, pool: &[Question]) -> usize {
        CategoryFilter::new(&self.selected).count(pool)
    }

    /// The requested count clamped to what the filter leaves.
    pub fn effective_count(&self, pool: &[Question]) -> usize {
        self.question_count.min(self.max_questions(pool))
    }

    pub fn can_start(&self, pool: &[Question]) -> bool {
        self.max_questions(pool) > 0
    }

    pub fn to_settings(&self, pool: &[Question]) -> QuizSettings {
        QuizSettings::new(
            self.selected.clone(),
            self.effective_count(pool).max(1),
            self.time_limit_minutes * 60,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::question::fixtures;

    fn study_form() -> SetupForm {
        SetupForm::new(QuizMode::Study, vec!["A".into(), "B".into()], 10, 10)
    }

    #[test]
    fn test_exam_has_no_category_rows() {
        let form = SetupForm::new(QuizMode::Exam, vec!["A".into()], 10, 10);
        assert_eq!(
            form.rows(),
            vec![SetupRow::QuestionCount, SetupRow::TimeLimit]
        );
    }

    #[test]
    fn test_study_rows_list_categories() {
        let rows = study_form().rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], SetupRow::AllCategories);
        assert_eq!(rows[2], SetupRow::Category("B".into()));
    }

    #[test]
    fn test_count_is_clamped_to_filtered_pool() {
        let pool = fixtures::pool(12, 8);
        let mut form = study_form();
        form.question_count = 15;
        assert_eq!(form.effective_count(&pool), 15);
        form.toggle_category("A");
        assert_eq!(form.max_questions(&pool), 12);
        let settings = form.to_settings(&pool);
        assert_eq!(settings.question_count, 12);
        assert_eq!(settings.time_limit, 600);
        assert!(settings.categories.contains("A"));
    }

    #[test]
    fn test_toggle_and_select_all() {
        let mut form = study_form();
        form.toggle_category("A");
        form.toggle_category("B");
        form.toggle_category("A");
        assert_eq!(form.selected.len(), 1);
        form.cursor = 0;
        form.toggle_current();
        assert!(form.selected.is_empty());
    }

    #[test]
    fn test_start_blocked_when_pool_empty() {
        let form = study_form();
        assert!(!form.can_start(&[]));
        assert!(form.can_start(&fixtures::pool(1, 0)));
    }

    #[test]
    fn test_adjusting_count_and_time_respects_bounds() {
        let pool = fixtures::pool(3, 0);
        let mut form = SetupForm::new(QuizMode::Exam, vec!["A".into()], 10, 180);

        form.cursor = 0;
        form.increase(&pool);
        assert_eq!(form.question_count, 3);
        for _ in 0..5 {
            form.decrease(&pool);
        }
        assert_eq!(form.question_count, 1);

        form.cursor_down();
        form.increase(&pool);
        assert_eq!(form.time_limit_minutes, MAX_MINUTES);
        form.time_limit_minutes = 1;
        form.decrease(&pool);
        assert_eq!(form.time_limit_minutes, MIN_MINUTES);
    }

    #[test]
    fn test_cursor_stays_in_range() {
        let mut form = study_form();
        for _ in 0..10 {
            form.cursor_down();
        }
        assert_eq!(form.current_row(), Some(SetupRow::TimeLimit));
        for _ in 0..10 {
            form.cursor_up();
        }
        assert_eq!(form.current_row(), Some(SetupRow::AllCategories));
    }
}
