use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::scoring::{self, Grade};
use crate::session::attempt::QuizAttempt;
use crate::ui::theme::Theme;

pub struct HistoryTable<'a> {
    pub rows: &'a [&'a QuizAttempt],
    pub selected: usize,
    pub title: String,
    pub theme: &'a Theme,
}

impl<'a> HistoryTable<'a> {
    pub fn new(rows: &'a [&'a QuizAttempt], selected: usize, title: String, theme: &'a Theme) -> Self {
        Self {
            rows,
            selected,
            title,
            theme,
        }
    }
}

fn status_cell(attempt: &QuizAttempt) -> String {
    match attempt.score {
        Some(score) if attempt.is_complete() => format!("{score:>6.1}%"),
        _ => format!(
            "{:>3}/{:<3}",
            attempt.answered_count(),
            attempt.user_answers.len()
        ),
    }
}

impl Widget for HistoryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", self.title),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.rows.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No attempts yet.",
                Style::default().fg(colors.text_muted()),
            )))
            .render(inner, buf);
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "   {:<16} {:<28} {:<6} {:<11} {:>7}",
                    "Started", "Knowledge base", "Mode", "Status", "Score"
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

        // Leave room for the header rows and keep the cursor in view.
        let visible = (inner.height as usize).saturating_sub(2).max(1);
        let skip = (self.selected + 1).saturating_sub(visible);

        for (i, attempt) in self.rows.iter().enumerate().skip(skip).take(visible) {
            let name: String = attempt.knowledge_base_name.chars().take(28).collect();
            let status = if attempt.is_complete() {
                "completed"
            } else {
                "in progress"
            };
            let row = format!(
                " {} {:<16} {name:<28} {:<6} {status:<11} {}",
                if i == self.selected { ">" } else { " " },
                attempt
                    .started_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
                attempt.mode.as_str(),
                status_cell(attempt),
            );

            let color = match attempt.score {
                Some(score) => match scoring::grade(score) {
                    Grade::Strong => colors.success(),
                    Grade::Passing => colors.warning(),
                    Grade::Weak => colors.error(),
                },
                None => colors.text_muted(),
            };
            let style = if i == self.selected {
                Style::default().fg(color).bg(colors.selection_bg())
            } else {
                Style::default().fg(color)
            };
            lines.push(Line::from(Span::styled(row, style)));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
