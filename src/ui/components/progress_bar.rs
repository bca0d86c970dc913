use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Overall lesson completion, e.g. "3/9 lessons  33%".
pub struct ProgressBar<'a> {
    completed: usize,
    total: usize,
    percent: u32,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(completed: usize, total: usize, percent: u32, theme: &'a Theme) -> Self {
        Self {
            completed,
            total,
            percent: percent.min(100),
            theme,
        }
    }

    fn label(&self) -> String {
        format!("{}/{} lessons  {}%", self.completed, self.total, self.percent)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Course Progress ")
            .border_style(Style::default().fg(colors.border));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (inner.width as u32 * self.percent / 100) as u16;
        let label = self.label();

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg).bg(colors.bar_filled)
            } else {
                Style::default().fg(colors.fg).bg(colors.bar_empty)
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg));
    }
}
