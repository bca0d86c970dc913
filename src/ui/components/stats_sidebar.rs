use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use devtype::engine::metrics::TypingMetrics;
use devtype::session::lesson::PassThreshold;
use devtype::session::progress::LessonProgress;

use crate::ui::theme::Theme;

pub struct StatsSidebar<'a> {
    metrics: &'a TypingMetrics,
    threshold: PassThreshold,
    time_remaining: Option<u64>,
    best: Option<&'a LessonProgress>,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(
        metrics: &'a TypingMetrics,
        threshold: PassThreshold,
        time_remaining: Option<u64>,
        best: Option<&'a LessonProgress>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            metrics,
            threshold,
            time_remaining,
            best,
            theme,
        }
    }
}

fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(12), Constraint::Length(7)])
            .split(area);

        // Current attempt
        {
            let m = self.metrics;
            let wpm_color = if m.wpm >= self.threshold.min_wpm {
                colors.success
            } else {
                colors.accent
            };
            let acc_color = if m.accuracy >= self.threshold.min_accuracy {
                colors.success
            } else if m.accuracy + 10 >= self.threshold.min_accuracy {
                colors.warning
            } else {
                colors.error
            };

            let mut lines = vec![
                Line::from(vec![
                    Span::styled("WPM: ", Style::default().fg(colors.fg)),
                    Span::styled(m.wpm.to_string(), Style::default().fg(wpm_color)),
                    Span::styled(
                        format!("  (need {})", self.threshold.min_wpm),
                        Style::default().fg(colors.text_pending),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Accuracy: ", Style::default().fg(colors.fg)),
                    Span::styled(format!("{}%", m.accuracy), Style::default().fg(acc_color)),
                    Span::styled(
                        format!("  (need {}%)", self.threshold.min_accuracy),
                        Style::default().fg(colors.text_pending),
                    ),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Correct: ", Style::default().fg(colors.fg)),
                    Span::styled(
                        format!("{}/{}", m.correct_chars, m.total_chars),
                        Style::default().fg(colors.success),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Errors:  ", Style::default().fg(colors.fg)),
                    Span::styled(m.errors.to_string(), Style::default().fg(colors.error)),
                ]),
                Line::from(vec![
                    Span::styled("Chars/s: ", Style::default().fg(colors.fg)),
                    Span::styled(
                        format!("{:.2}", m.characters_per_second),
                        Style::default().fg(colors.fg),
                    ),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Time: ", Style::default().fg(colors.fg)),
                    Span::styled(format_clock(m.elapsed_time), Style::default().fg(colors.fg)),
                ]),
            ];
            if let Some(remaining) = self.time_remaining {
                lines.push(Line::from(vec![
                    Span::styled("Left: ", Style::default().fg(colors.fg)),
                    Span::styled(
                        format_clock(remaining),
                        Style::default().fg(if remaining <= 10 {
                            colors.warning
                        } else {
                            colors.accent
                        }),
                    ),
                ]));
            }

            let block = Block::bordered()
                .title(" Stats ")
                .border_style(Style::default().fg(colors.border))
                .style(Style::default().bg(colors.bg));
            Paragraph::new(lines).block(block).render(sections[0], buf);
        }

        // Best so far for this lesson
        {
            let lines = match self.best {
                Some(best) => vec![
                    Line::from(vec![
                        Span::styled("Best WPM: ", Style::default().fg(colors.fg)),
                        Span::styled(
                            best.best_wpm.to_string(),
                            Style::default().fg(colors.accent),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled("Best Acc: ", Style::default().fg(colors.fg)),
                        Span::styled(
                            format!("{}%", best.best_accuracy),
                            Style::default().fg(colors.accent),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled("Attempts: ", Style::default().fg(colors.fg)),
                        Span::styled(best.attempts.to_string(), Style::default().fg(colors.fg)),
                    ]),
                ],
                None => vec![Line::from(Span::styled(
                    "First attempt",
                    Style::default().fg(colors.text_pending),
                ))],
            };

            let block = Block::bordered()
                .title(" Lesson Best ")
                .border_style(Style::default().fg(colors.border))
                .style(Style::default().bg(colors.bg));
            Paragraph::new(lines).block(block).render(sections[1], buf);
        }
    }
}
