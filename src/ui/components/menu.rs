use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use devtype::session::lesson::LessonCatalog;
use devtype::session::progress::ProgressTracker;

use crate::ui::theme::Theme;

/// Lesson picker with completion marks.
pub struct LessonMenu<'a> {
    catalog: &'a LessonCatalog,
    progress: &'a ProgressTracker,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> LessonMenu<'a> {
    pub fn new(
        catalog: &'a LessonCatalog,
        progress: &'a ProgressTracker,
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            catalog,
            progress,
            selected,
            theme,
        }
    }
}

impl Widget for LessonMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.bg));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "devtype",
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "हिंदी टाइपिंग \u{00b7} InScript",
                Style::default().fg(colors.fg),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        // Keep the selection visible when the list is taller than the area.
        let visible = layout[1].height as usize;
        let skip = if visible == 0 {
            0
        } else {
            self.selected.saturating_sub(visible - 1)
        };

        let lines: Vec<Line> = self
            .catalog
            .iter()
            .enumerate()
            .skip(skip)
            .take(visible)
            .map(|(i, lesson)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { ">" } else { " " };
                let progress = self.progress.get(&lesson.id);
                let (mark, mark_color) = match progress {
                    Some(p) if p.completed => ("\u{2713}", colors.success),
                    Some(_) => ("\u{2022}", colors.warning),
                    None => (" ", colors.text_pending),
                };
                let best = progress
                    .map(|p| format!("  best {} wpm / {}%", p.best_wpm, p.best_accuracy))
                    .unwrap_or_default();

                Line::from(vec![
                    Span::styled(format!(" {indicator} "), Style::default().fg(colors.accent)),
                    Span::styled(mark, Style::default().fg(mark_color)),
                    Span::styled(
                        format!(" {:>2}. {}", i + 1, lesson.title),
                        Style::default()
                            .fg(if is_selected { colors.accent } else { colors.fg })
                            .add_modifier(if is_selected {
                                Modifier::BOLD
                            } else {
                                Modifier::empty()
                            }),
                    ),
                    Span::styled(best, Style::default().fg(colors.text_pending)),
                ])
            })
            .collect();

        Paragraph::new(lines).render(layout[1], buf);
    }
}
