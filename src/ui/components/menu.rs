use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Study,
    Exam,
    History,
    Back,
}

pub struct MenuItem {
    pub key: char,
    pub label: &'static str,
    pub description: &'static str,
    pub action: MenuAction,
}

/// Mode picker shown after a knowledge base is opened.
pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub title: String,
    pub subtitle: String,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: '1',
                    label: "Study Mode",
                    description: "Pick categories, check each answer as you go",
                    action: MenuAction::Study,
                },
                MenuItem {
                    key: '2',
                    label: "Exam Mode",
                    description: "All categories, move freely, score at the end",
                    action: MenuAction::Exam,
                },
                MenuItem {
                    key: 'h',
                    label: "History",
                    description: "Review past attempts or resume an unfinished one",
                    action: MenuAction::History,
                },
                MenuItem {
                    key: 'b',
                    label: "Back",
                    description: "Return to your knowledge bases",
                    action: MenuAction::Back,
                },
            ],
            selected: 0,
            title: String::new(),
            subtitle: String::new(),
            theme,
        }
    }

    pub fn set_heading(&mut self, title: &str, subtitle: String) {
        self.title = title.to_string();
        self.subtitle = subtitle;
        self.selected = 0;
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        self.selected = (self.selected + self.items.len() - 1) % self.items.len();
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|i| i.action)
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items.iter().find(|i| i.key == key).map(|i| i.action)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.title.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.subtitle.as_str(),
                Style::default().fg(colors.text_muted()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(self.items.iter().map(|_| Constraint::Length(3)))
            .split(layout[2]);

        for ((i, item), row) in self.items.iter().enumerate().zip(rows.iter()) {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(Span::styled(
                    format!(" {indicator} [{}] {}", item.key, item.label),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("     {}", item.description),
                    Style::default().fg(if is_selected {
                        colors.accent_dim()
                    } else {
                        colors.text_muted()
                    }),
                )),
            ];
            Paragraph::new(lines).render(*row, buf);
        }
    }
}
