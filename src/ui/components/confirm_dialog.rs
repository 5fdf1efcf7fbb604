use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Small y/n overlay centered in the area it is rendered into.
pub struct ConfirmDialog<'a> {
    pub question: String,
    pub theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(question: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            question: question.into(),
            theme,
        }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let text = format!("  {} (y/n)  ", self.question);

        let width = (text.chars().count() as u16 + 2).min(area.width);
        let height = 5u16.min(area.height);
        let dialog_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        Clear.render(dialog_area, buf);
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(text, Style::default().fg(colors.fg()))),
        ])
        .style(Style::default().bg(colors.bg()))
        .block(
            Block::bordered()
                .title(" Confirm ")
                .border_style(Style::default().fg(colors.error()))
                .style(Style::default().bg(colors.bg())),
        )
        .render(dialog_area, buf);
    }
}
