use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use devtype::session::lesson::PassThreshold;
use devtype::session::progress::LessonProgress;
use devtype::session::result::SessionResult;

use crate::ui::theme::Theme;

/// End-of-attempt summary.
pub struct Dashboard<'a> {
    result: &'a SessionResult,
    threshold: PassThreshold,
    progress: Option<&'a LessonProgress>,
    warning: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        result: &'a SessionResult,
        threshold: PassThreshold,
        progress: Option<&'a LessonProgress>,
        warning: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            result,
            threshold,
            progress,
            warning,
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let m = &self.result.metrics;

        let block = Block::bordered()
            .title(format!(" Attempt {} ", self.result.end_reason.as_str()))
            .border_style(Style::default().fg(colors.accent))
            .style(Style::default().bg(colors.bg));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let (verdict, verdict_color) = if self.result.passed {
            ("Passed", colors.success)
        } else {
            ("Not passed yet", colors.warning)
        };
        Paragraph::new(Line::from(Span::styled(
            verdict,
            Style::default()
                .fg(verdict_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let speed = Line::from(vec![
            Span::styled("  Speed:    ", Style::default().fg(colors.fg)),
            Span::styled(
                format!("{} WPM", m.wpm),
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  ({:.2} chars/s, need {} WPM)",
                    m.characters_per_second, self.threshold.min_wpm
                ),
                Style::default().fg(colors.text_pending),
            ),
        ]);
        Paragraph::new(speed).render(layout[1], buf);

        let acc_color = if m.accuracy >= self.threshold.min_accuracy {
            colors.success
        } else {
            colors.error
        };
        let accuracy = Line::from(vec![
            Span::styled("  Accuracy: ", Style::default().fg(colors.fg)),
            Span::styled(
                format!("{}%", m.accuracy),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  ({}/{} correct, need {}%)",
                    m.correct_chars, m.total_chars, self.threshold.min_accuracy
                ),
                Style::default().fg(colors.text_pending),
            ),
        ]);
        Paragraph::new(accuracy).render(layout[2], buf);

        let errors = Line::from(vec![
            Span::styled("  Errors:   ", Style::default().fg(colors.fg)),
            Span::styled(
                m.errors.to_string(),
                Style::default().fg(if m.errors == 0 {
                    colors.success
                } else {
                    colors.error
                }),
            ),
        ]);
        Paragraph::new(errors).render(layout[3], buf);

        let time = Line::from(vec![
            Span::styled("  Time:     ", Style::default().fg(colors.fg)),
            Span::styled(format!("{}s", m.elapsed_time), Style::default().fg(colors.fg)),
        ]);
        Paragraph::new(time).render(layout[4], buf);

        if let Some(p) = self.progress {
            let completed = p
                .completed_date
                .map(|d| format!("  completed {}", d.format("%Y-%m-%d")))
                .unwrap_or_default();
            let best = Line::from(vec![
                Span::styled("  Best:     ", Style::default().fg(colors.fg)),
                Span::styled(
                    format!("{} WPM / {}%", p.best_wpm, p.best_accuracy),
                    Style::default().fg(colors.accent),
                ),
                Span::styled(
                    format!("  after {} attempts{completed}", p.attempts),
                    Style::default().fg(colors.text_pending),
                ),
            ]);
            Paragraph::new(best).render(layout[5], buf);
        }

        if let Some(warning) = self.warning {
            Paragraph::new(Line::from(Span::styled(
                format!("  {warning}"),
                Style::default().fg(colors.error),
            )))
            .wrap(Wrap { trim: true })
            .render(layout[6], buf);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [r/Enter] Retry  ", Style::default().fg(colors.accent)),
            Span::styled("[n] Next lesson  ", Style::default().fg(colors.accent)),
            Span::styled("[q/Esc] Menu", Style::default().fg(colors.accent)),
        ]));
        help.render(layout[7], buf);
    }
}
