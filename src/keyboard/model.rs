/// One key of the physical keyboard, identified by its position code
/// (the `KeyboardEvent.code` naming: `KeyA`, `Quote`, `BracketLeft`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalKey {
    pub code: &'static str,
    pub base: char,
    pub shifted: char,
}

const fn key(code: &'static str, base: char, shifted: char) -> PhysicalKey {
    PhysicalKey {
        code,
        base,
        shifted,
    }
}

#[derive(Clone, Debug)]
pub struct KeyboardModel {
    pub rows: Vec<Vec<PhysicalKey>>,
}

impl KeyboardModel {
    pub fn qwerty() -> Self {
        Self {
            rows: vec![
                vec![
                    key("Backquote", '`', '~'),
                    key("Digit1", '1', '!'),
                    key("Digit2", '2', '@'),
                    key("Digit3", '3', '#'),
                    key("Digit4", '4', '$'),
                    key("Digit5", '5', '%'),
                    key("Digit6", '6', '^'),
                    key("Digit7", '7', '&'),
                    key("Digit8", '8', '*'),
                    key("Digit9", '9', '('),
                    key("Digit0", '0', ')'),
                    key("Minus", '-', '_'),
                    key("Equal", '=', '+'),
                ],
                vec![
                    key("KeyQ", 'q', 'Q'),
                    key("KeyW", 'w', 'W'),
                    key("KeyE", 'e', 'E'),
                    key("KeyR", 'r', 'R'),
                    key("KeyT", 't', 'T'),
                    key("KeyY", 'y', 'Y'),
                    key("KeyU", 'u', 'U'),
                    key("KeyI", 'i', 'I'),
                    key("KeyO", 'o', 'O'),
                    key("KeyP", 'p', 'P'),
                    key("BracketLeft", '[', '{'),
                    key("BracketRight", ']', '}'),
                    key("Backslash", '\\', '|'),
                ],
                vec![
                    key("KeyA", 'a', 'A'),
                    key("KeyS", 's', 'S'),
                    key("KeyD", 'd', 'D'),
                    key("KeyF", 'f', 'F'),
                    key("KeyG", 'g', 'G'),
                    key("KeyH", 'h', 'H'),
                    key("KeyJ", 'j', 'J'),
                    key("KeyK", 'k', 'K'),
                    key("KeyL", 'l', 'L'),
                    key("Semicolon", ';', ':'),
                    key("Quote", '\'', '"'),
                ],
                vec![
                    key("KeyZ", 'z', 'Z'),
                    key("KeyX", 'x', 'X'),
                    key("KeyC", 'c', 'C'),
                    key("KeyV", 'v', 'V'),
                    key("KeyB", 'b', 'B'),
                    key("KeyN", 'n', 'N'),
                    key("KeyM", 'm', 'M'),
                    key("Comma", ',', '<'),
                    key("Period", '.', '>'),
                    key("Slash", '/', '?'),
                ],
            ],
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &PhysicalKey> {
        self.rows.iter().flatten()
    }

    /// Look up a key by its position code.
    pub fn key_for_code(&self, code: &str) -> Option<&PhysicalKey> {
        self.keys().find(|k| k.code == code)
    }

    /// Find the key that produces `ch`, shifted or not.
    pub fn physical_key_for(&self, ch: char) -> Option<&PhysicalKey> {
        self.keys().find(|k| k.base == ch || k.shifted == ch)
    }

    /// Position code of the key that produces `ch`.
    ///
    /// Terminals only report the produced character, so this is how the
    /// front-end recovers a physical position for the resolver.
    pub fn code_for_char(&self, ch: char) -> Option<&'static str> {
        self.physical_key_for(ch).map(|k| k.code)
    }

    /// Given a base character, return its shifted counterpart.
    pub fn base_to_shifted(&self, ch: char) -> Option<char> {
        self.physical_key_for(ch)
            .filter(|pk| pk.base == ch)
            .map(|pk| pk.shifted)
    }

    /// Given a shifted character, return its base counterpart.
    pub fn shifted_to_base(&self, ch: char) -> Option<char> {
        self.physical_key_for(ch)
            .filter(|pk| pk.shifted == ch)
            .map(|pk| pk.base)
    }
}

impl Default for KeyboardModel {
    fn default() -> Self {
        Self::qwerty()
    }
}
