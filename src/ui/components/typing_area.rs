use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    target: &'a str,
    typed: &'a str,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(target: &'a str, typed: &'a str, theme: &'a Theme) -> Self {
        Self {
            target,
            typed,
            theme,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharState {
    Correct(char),
    /// Expected char, typed char.
    Incorrect(char, char),
    /// Typed past the end of the target.
    Extra(char),
    Cursor(char),
    Pending(char),
}

fn char_states(target: &str, typed: &str) -> Vec<CharState> {
    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    let mut states = Vec::with_capacity(target.len().max(typed.len()) + 1);

    for (i, &expected) in target.iter().enumerate() {
        let state = match typed.get(i) {
            Some(&actual) if actual == expected => CharState::Correct(expected),
            Some(&actual) => CharState::Incorrect(expected, actual),
            None if i == typed.len() => CharState::Cursor(expected),
            None => CharState::Pending(expected),
        };
        states.push(state);
    }
    for &extra in typed.iter().skip(target.len()) {
        states.push(CharState::Extra(extra));
    }
    states
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let incorrect = Style::default()
            .fg(colors.text_incorrect)
            .bg(colors.text_incorrect_bg)
            .add_modifier(Modifier::UNDERLINED);

        let spans: Vec<Span> = char_states(self.target, self.typed)
            .into_iter()
            .map(|state| match state {
                CharState::Correct(ch) => {
                    Span::styled(ch.to_string(), Style::default().fg(colors.text_correct))
                }
                // Show a mistyped space as a visible marker.
                CharState::Incorrect(_, ' ') => Span::styled("\u{00b7}", incorrect),
                CharState::Incorrect(_, actual) | CharState::Extra(actual) => {
                    Span::styled(actual.to_string(), incorrect)
                }
                CharState::Cursor(ch) => Span::styled(
                    ch.to_string(),
                    Style::default()
                        .fg(colors.text_cursor_fg)
                        .bg(colors.text_cursor_bg),
                ),
                CharState::Pending(ch) => {
                    Span::styled(ch.to_string(), Style::default().fg(colors.text_pending))
                }
            })
            .collect();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.bg));

        let typed_line = Line::from(Span::styled(
            format!("\u{203a} {}", self.typed),
            Style::default().fg(colors.fg),
        ));

        Paragraph::new(vec![Line::from(spans), Line::from(""), typed_line])
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_before_typing() {
        let states = char_states("ab", "");
        assert_eq!(states, vec![CharState::Cursor('a'), CharState::Pending('b')]);
    }

    #[test]
    fn test_states_mixed() {
        let states = char_states("abc", "ax");
        assert_eq!(
            states,
            vec![
                CharState::Correct('a'),
                CharState::Incorrect('b', 'x'),
                CharState::Cursor('c'),
            ]
        );
    }

    #[test]
    fn test_states_overflow() {
        let states = char_states("a", "abc");
        assert_eq!(
            states,
            vec![
                CharState::Correct('a'),
                CharState::Extra('b'),
                CharState::Extra('c'),
            ]
        );
    }
}
