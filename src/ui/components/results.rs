use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::question::{KnowledgeBase, option_label};
use crate::engine::scoring::{self, Grade};
use crate::session::attempt::QuizAttempt;
use crate::ui::theme::Theme;

pub struct ResultsView<'a> {
    pub base: &'a KnowledgeBase,
    pub attempt: &'a QuizAttempt,
    pub scroll: usize,
    pub theme: &'a Theme,
}

impl<'a> ResultsView<'a> {
    pub fn new(base: &'a KnowledgeBase, attempt: &'a QuizAttempt, scroll: usize, theme: &'a Theme) -> Self {
        Self {
            base,
            attempt,
            scroll,
            theme,
        }
    }

    /// One block of lines per answered-or-skipped question, in quiz order.
    fn review_lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let mut lines = Vec::new();

        for (n, answer) in self.attempt.user_answers.iter().enumerate() {
            let Some(question) = self.base.question(answer.question_id) else {
                lines.push(Line::from(Span::styled(
                    format!("{:>3}. (question no longer in this base)", n + 1),
                    Style::default().fg(colors.text_muted()),
                )));
                continue;
            };

            let (mark, mark_color) = match answer.is_correct {
                Some(true) => ("\u{2713}", colors.success()),
                Some(false) => ("\u{2717}", colors.error()),
                None => ("-", colors.warning()),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>3}. {mark} ", n + 1),
                    Style::default().fg(mark_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(question.question.as_str(), Style::default().fg(colors.fg())),
            ]));

            let yours = match answer.selected_option_index {
                Some(i) => format!(
                    "{}: {}",
                    option_label(i),
                    question.options.get(i).map(String::as_str).unwrap_or("?")
                ),
                None => "not answered".to_string(),
            };
            lines.push(Line::from(Span::styled(
                format!("       Your answer: {yours}"),
                Style::default().fg(colors.text_muted()),
            )));
            if !answer.counts_as_correct() {
                lines.push(Line::from(Span::styled(
                    format!(
                        "       Correct:     {}: {}",
                        option_label(question.correct_answer_index),
                        question.correct_option().unwrap_or_default()
                    ),
                    Style::default().fg(colors.success()),
                )));
            }
            if !question.source.trim().is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("       Source:      {}", question.source),
                    Style::default().fg(colors.text_muted()),
                )));
            }
        }
        lines
    }
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} Results ", self.attempt.mode.label()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.attempt.knowledge_base_name.as_str(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let total = self.attempt.user_answers.len();
        let correct = self.attempt.correct_count();
        let score = self
            .attempt
            .score
            .unwrap_or_else(|| scoring::score_percent(correct, total));
        let score_color = match scoring::grade(score) {
            Grade::Strong => colors.success(),
            Grade::Passing => colors.warning(),
            Grade::Weak => colors.error(),
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Score:    ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{score:.2}%"),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({correct}/{total} correct)"),
                Style::default().fg(colors.text_muted()),
            ),
        ]))
        .render(layout[1], buf);

        let skipped = total - self.attempt.answered_count();
        Paragraph::new(Line::from(vec![
            Span::styled("  Skipped:  ", Style::default().fg(colors.fg())),
            Span::styled(
                skipped.to_string(),
                Style::default().fg(if skipped == 0 {
                    colors.success()
                } else {
                    colors.warning()
                }),
            ),
        ]))
        .render(layout[2], buf);

        let duration = self
            .attempt
            .completed_at
            .map(|done| done - self.attempt.started_at)
            .map(|d| format!("{}m {:02}s", d.num_minutes(), d.num_seconds() % 60))
            .unwrap_or_else(|| "in progress".to_string());
        Paragraph::new(Line::from(vec![
            Span::styled("  Time:     ", Style::default().fg(colors.fg())),
            Span::styled(duration, Style::default().fg(colors.fg())),
        ]))
        .render(layout[3], buf);

        Paragraph::new(self.review_lines())
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(self.scroll).unwrap_or(u16::MAX), 0))
            .block(
                Block::bordered()
                    .title(" Review ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(layout[5], buf);
    }
}
