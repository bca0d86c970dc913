use crate::keyboard::layout::TransliterationLayout;
use crate::keyboard::model::KeyboardModel;

/// Resolves key events to layout symbols and their transliterated output.
///
/// Resolution is two-tier: a known physical key code wins, otherwise the
/// logical key value is used, lowercased when it is a single letter. Shift
/// state comes only from the `shift` flag, never from the letter case.
#[derive(Clone, Debug)]
pub struct KeyResolver<'a> {
    model: &'a KeyboardModel,
    layout: &'a TransliterationLayout,
}

impl<'a> KeyResolver<'a> {
    pub fn new(model: &'a KeyboardModel, layout: &'a TransliterationLayout) -> Self {
        Self { model, layout }
    }

    /// The layout symbol a key event stands for, if any.
    pub fn resolve(&self, key: &str, code: Option<&str>) -> Option<char> {
        if let Some(pk) = code.and_then(|c| self.model.key_for_code(c)) {
            return Some(pk.base);
        }
        single_char(key).map(|ch| if ch.is_alphabetic() { lowercase(ch) } else { ch })
    }

    /// Output for one key event. Unmapped keys pass through unchanged.
    pub fn map_key<'k>(&self, key: &'k str, shift: bool, code: Option<&str>) -> &'k str {
        let Some(mapping) = self
            .resolve(key, code)
            .and_then(|symbol| self.layout.lookup(symbol))
        else {
            return key;
        };
        if shift { mapping.shift } else { mapping.normal }
    }

    /// Append the output of one key event to `accumulated`.
    pub fn transliterate(
        &self,
        accumulated: &str,
        key: &str,
        shift: bool,
        code: Option<&str>,
    ) -> String {
        let piece = self.map_key(key, shift, code);
        let mut out = String::with_capacity(accumulated.len() + piece.len());
        out.push_str(accumulated);
        out.push_str(piece);
        out
    }

    /// Transliterate a QWERTY character sequence, treating each character as
    /// the key press that would produce it on a US keyboard.
    pub fn transliterate_qwerty(&self, input: &str) -> String {
        input.chars().fold(String::new(), |acc, ch| {
            let press = KeyPress::from_char(self.model, ch);
            self.transliterate(&acc, &press.key, press.shift, press.code)
        })
    }
}

/// A key event as delivered by an input source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub shift: bool,
    pub code: Option<&'static str>,
}

impl KeyPress {
    /// Reconstruct the key event behind a produced character.
    pub fn from_char(model: &KeyboardModel, ch: char) -> Self {
        Self {
            key: ch.to_string(),
            shift: model.shifted_to_base(ch).is_some(),
            code: model.code_for_char(ch),
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

fn lowercase(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => ch,
    }
}
