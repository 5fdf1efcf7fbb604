use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::bank::question::Question;
use crate::session::settings::QuizMode;
use crate::session::setup::{SetupForm, SetupRow};
use crate::ui::theme::Theme;

pub struct SetupView<'a> {
    pub form: &'a SetupForm,
    pub pool: &'a [Question],
    pub base_name: &'a str,
    pub theme: &'a Theme,
}

impl<'a> SetupView<'a> {
    pub fn new(form: &'a SetupForm, pool: &'a [Question], base_name: &'a str, theme: &'a Theme) -> Self {
        Self {
            form,
            pool,
            base_name,
            theme,
        }
    }

    fn row_text(&self, row: &SetupRow) -> String {
        let check = |on: bool| if on { "[x]" } else { "[ ]" };
        match row {
            SetupRow::AllCategories => {
                format!("{} All categories", check(self.form.selected.is_empty()))
            }
            SetupRow::Category(name) => {
                let count = self.pool.iter().filter(|q| &q.category == name).count();
                let label = if name.is_empty() { "(uncategorized)" } else { name.as_str() };
                format!(
                    "{} {label} ({count})",
                    check(self.form.selected.contains(name))
                )
            }
            SetupRow::QuestionCount => format!(
                "Questions:  < {} >  of {}",
                self.form.effective_count(self.pool),
                self.form.max_questions(self.pool)
            ),
            SetupRow::TimeLimit => {
                format!("Time limit: < {} min >", self.form.time_limit_minutes)
            }
        }
    }
}

impl Widget for SetupView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} Setup ", self.form.mode.label()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let intro = match self.form.mode {
            QuizMode::Study => "Choose categories; each answer is checked as you go.",
            QuizMode::Exam => "Questions come from every category; the score is shown at the end.",
        };
        Paragraph::new(vec![
            Line::from(Span::styled(
                self.base_name,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(intro, Style::default().fg(colors.text_muted()))),
        ])
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let rows = self.form.rows();
        // Keep the cursor row visible when there are many categories.
        let visible = layout[1].height as usize;
        let skip = (self.form.cursor + 1).saturating_sub(visible);
        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, row)| {
                let is_selected = i == self.form.cursor;
                let style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .bg(colors.selection_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                let marker = if is_selected { " > " } else { "   " };
                Line::from(Span::styled(format!("{marker}{}", self.row_text(row)), style))
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);

        let status = if self.form.can_start(self.pool) {
            Span::styled(
                "  Ready. Press [Enter] to start.",
                Style::default().fg(colors.success()),
            )
        } else {
            Span::styled(
                "  No questions match the selected categories.",
                Style::default().fg(colors.error()),
            )
        };
        Paragraph::new(Line::from(status)).render(layout[2], buf);
    }
}
