use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::bank::question::KnowledgeBase;
use crate::session::attempt::QuizAttempt;
use crate::ui::theme::Theme;

pub struct BaseList<'a> {
    pub bases: &'a [KnowledgeBase],
    pub attempts: &'a [QuizAttempt],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> BaseList<'a> {
    pub fn new(
        bases: &'a [KnowledgeBase],
        attempts: &'a [QuizAttempt],
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            bases,
            attempts,
            selected,
            theme,
        }
    }
}

/// Attempts taken against `base_id` and the best completed score among them.
fn attempt_summary(attempts: &[QuizAttempt], base_id: &str) -> (usize, Option<f64>) {
    let mine = attempts.iter().filter(|a| a.knowledge_base_id == base_id);
    let count = mine.clone().count();
    let best = mine.filter_map(|a| a.score).reduce(f64::max);
    (count, best)
}

impl Widget for BaseList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Knowledge Bases ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.bases.is_empty() {
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No knowledge bases yet. Press [i] to import a JSON question file.",
                    Style::default().fg(colors.text_muted()),
                )),
            ])
            .render(inner, buf);
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "   {:<32} {:>9} {:>10} {:>8} {:>7}  {}",
                    "Name", "Questions", "Categories", "Attempts", "Best", "Created"
                ),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("  {}", "\u{2500}".repeat(inner.width.saturating_sub(4) as usize)),
                Style::default().fg(colors.border()),
            )),
        ];

        for (i, base) in self.bases.iter().enumerate() {
            let (attempt_count, best) = attempt_summary(self.attempts, &base.id);
            let best_str = best.map_or_else(|| "-".to_string(), |s| format!("{s:.0}%"));
            let name: String = base.name.chars().take(32).collect();
            let is_selected = i == self.selected;
            let marker = if is_selected { ">" } else { " " };
            let row = format!(
                " {marker} {name:<32} {:>9} {:>10} {attempt_count:>8} {best_str:>7}  {}",
                base.questions.len(),
                base.categories().len(),
                base.created_at.format("%Y-%m-%d"),
            );
            let style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(row, style)));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
