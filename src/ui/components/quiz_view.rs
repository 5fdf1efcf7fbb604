use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::question::{Question, option_label};
use crate::session::answer::{self, UserAnswer};
use crate::session::quiz::QuizSession;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// Remaining seconds at which the timer turns to the warning color.
const TIMER_LOW_SECS: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Plain,
    Selected,
    Correct,
    Wrong,
}

/// How option `index` is drawn. `reveal` shows the key after a study check.
pub fn option_state(question: &Question, answer: &UserAnswer, index: usize, reveal: bool) -> OptionState {
    let chosen = answer.selected_option_index == Some(index);
    if reveal {
        if question.is_correct(index) {
            return OptionState::Correct;
        }
        if chosen {
            return OptionState::Wrong;
        }
        return OptionState::Plain;
    }
    if chosen {
        OptionState::Selected
    } else {
        OptionState::Plain
    }
}

pub struct QuizView<'a> {
    pub session: &'a QuizSession,
    pub theme: &'a Theme,
}

impl<'a> QuizView<'a> {
    pub fn new(session: &'a QuizSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn feedback_lines(&self, question: &Question, answer: &UserAnswer) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let mut lines = Vec::new();
        if answer.counts_as_correct() {
            lines.push(Line::from(Span::styled(
                "Correct!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            let key = question.correct_option().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(
                    "Incorrect. ",
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "The answer is {}: {key}",
                        option_label(question.correct_answer_index)
                    ),
                    Style::default().fg(colors.fg()),
                ),
            ]));
        }
        if !question.source.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Source: {}", question.source),
                Style::default().fg(colors.text_muted()),
            )));
        }
        lines
    }
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (Some(question), Some(answer)) =
            (self.session.current_question(), self.session.current_answer())
        else {
            return;
        };
        let reveal = self.session.feedback_shown();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(if reveal { 4 } else { 0 }),
                Constraint::Length(3),
            ])
            .split(area);

        let remaining = self.session.countdown().remaining_secs();
        let timer_color = if remaining <= TIMER_LOW_SECS {
            colors.timer_low()
        } else {
            colors.fg()
        };
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    " {} | Question {}/{} ",
                    self.session.mode().label(),
                    self.session.index() + 1,
                    self.session.len()
                ),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", self.session.countdown().display()),
                Style::default()
                    .fg(timer_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .render(layout[0], buf);

        let title = if question.category.is_empty() {
            " Question ".to_string()
        } else {
            format!(" {} ", question.category)
        };
        let mut lines = vec![
            Line::from(Span::styled(
                question.question.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, option) in question.options.iter().enumerate() {
            let state = option_state(question, answer, i, reveal);
            let (marker, style) = match state {
                OptionState::Plain => ("  ", Style::default().fg(colors.fg())),
                OptionState::Selected => (
                    "> ",
                    Style::default()
                        .fg(colors.option_selected())
                        .add_modifier(Modifier::BOLD),
                ),
                OptionState::Correct => (
                    "\u{2713} ",
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                ),
                OptionState::Wrong => ("\u{2717} ", Style::default().fg(colors.error())),
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}. {option}", option_label(i)),
                style,
            )));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(colors.border_focused())),
            )
            .render(layout[1], buf);

        if reveal {
            Paragraph::new(self.feedback_lines(question, answer))
                .wrap(Wrap { trim: false })
                .block(Block::bordered().border_style(Style::default().fg(colors.border())))
                .render(layout[2], buf);
        }

        ProgressBar::new(
            "Answered",
            answer::answered_count(self.session.answers()),
            self.session.len(),
            self.theme,
        )
        .render(layout[3], buf);
    }
}
