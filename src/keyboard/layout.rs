/// Output of one physical key, keyed by the key's unshifted QWERTY symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyMapping {
    pub key: char,
    pub normal: &'static str,
    pub shift: &'static str,
}

const fn map(key: char, normal: &'static str, shift: &'static str) -> KeyMapping {
    KeyMapping { key, normal, shift }
}

/// Hindi InScript, as standardised for Devanagari on a US QWERTY board.
pub static INSCRIPT: &[KeyMapping] = &[
    // Number row
    map('`', "\u{094A}", "\u{0912}"), // ॊ ऒ
    map('1', "\u{0967}", "\u{090D}"), // १ ऍ
    map('2', "\u{0968}", "\u{0945}"), // २ ॅ
    map('3', "\u{0969}", "\u{094D}\u{0930}"), // ३ ्र
    map('4', "\u{096A}", "\u{0930}\u{094D}"), // ४ र्
    map('5', "\u{096B}", "\u{091C}\u{094D}\u{091E}"), // ५ ज्ञ
    map('6', "\u{096C}", "\u{0924}\u{094D}\u{0930}"), // ६ त्र
    map('7', "\u{096D}", "\u{0915}\u{094D}\u{0937}"), // ७ क्ष
    map('8', "\u{096E}", "\u{0936}\u{094D}\u{0930}"), // ८ श्र
    map('9', "\u{096F}", "("),
    map('0', "\u{0966}", ")"),
    map('-', "-", "\u{0903}"), // ः
    map('=', "\u{0943}", "\u{090B}"), // ृ ऋ
    // Top row
    map('q', "\u{094C}", "\u{0914}"), // ौ औ
    map('w', "\u{0948}", "\u{0910}"), // ै ऐ
    map('e', "\u{093E}", "\u{0906}"), // ा आ
    map('r', "\u{0940}", "\u{0908}"), // ी ई
    map('t', "\u{0942}", "\u{090A}"), // ू ऊ
    map('y', "\u{092C}", "\u{092D}"), // ब भ
    map('u', "\u{0939}", "\u{0919}"), // ह ङ
    map('i', "\u{0917}", "\u{0918}"), // ग घ
    map('o', "\u{0926}", "\u{0927}"), // द ध
    map('p', "\u{091C}", "\u{091D}"), // ज झ
    map('[', "\u{0921}", "\u{0922}"), // ड ढ
    map(']', "\u{093C}", "\u{091E}"), // ़ ञ
    map('\\', "\u{0949}", "\u{0911}"), // ॉ ऑ
    // Home row
    map('a', "\u{094B}", "\u{0913}"), // ो ओ
    map('s', "\u{0947}", "\u{090F}"), // े ए
    map('d', "\u{094D}", "\u{0905}"), // ् अ
    map('f', "\u{093F}", "\u{0907}"), // ि इ
    map('g', "\u{0941}", "\u{0909}"), // ु उ
    map('h', "\u{092A}", "\u{092B}"), // प फ
    map('j', "\u{0930}", "\u{0931}"), // र ऱ
    map('k', "\u{0915}", "\u{0916}"), // क ख
    map('l', "\u{0924}", "\u{0925}"), // त थ
    map(';', "\u{091A}", "\u{091B}"), // च छ
    map('\'', "\u{091F}", "\u{0920}"), // ट ठ
    // Bottom row
    map('z', "\u{0946}", "\u{090E}"), // ॆ ऎ
    map('x', "\u{0902}", "\u{0901}"), // ं ँ
    map('c', "\u{092E}", "\u{0923}"), // म ण
    map('v', "\u{0928}", "\u{0929}"), // न ऩ
    map('b', "\u{0935}", "\u{0934}"), // व ऴ
    map('n', "\u{0932}", "\u{0933}"), // ल ळ
    map('m', "\u{0938}", "\u{0936}"), // स श
    map(',', ",", "\u{0937}"), // , ष
    map('.', ".", "\u{0964}"), // . ।
    map('/', "\u{092F}", "\u{092F}\u{093C}"), // य य़
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutKind {
    Inscript,
}

impl LayoutKind {
    pub const ALL: &'static [LayoutKind] = &[LayoutKind::Inscript];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "inscript" => Some(LayoutKind::Inscript),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::Inscript => "inscript",
        }
    }
}

/// A read-only transliteration table. Built once and shared by reference.
#[derive(Clone, Copy, Debug)]
pub struct TransliterationLayout {
    pub kind: LayoutKind,
    pub mappings: &'static [KeyMapping],
}

impl TransliterationLayout {
    pub fn new(kind: LayoutKind) -> Self {
        let mappings = match kind {
            LayoutKind::Inscript => INSCRIPT,
        };
        Self { kind, mappings }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        LayoutKind::from_name(name).map(Self::new)
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn lookup(&self, key: char) -> Option<&KeyMapping> {
        self.mappings.iter().find(|m| m.key == key)
    }
}

impl Default for TransliterationLayout {
    fn default() -> Self {
        Self::new(LayoutKind::Inscript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::model::KeyboardModel;

    #[test]
    fn test_inscript_keys_are_unique() {
        let mut keys: Vec<char> = INSCRIPT.iter().map(|m| m.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), INSCRIPT.len());
    }

    #[test]
    fn test_every_mapping_has_both_outputs() {
        for m in INSCRIPT {
            assert!(!m.normal.is_empty(), "empty normal output for {:?}", m.key);
            assert!(!m.shift.is_empty(), "empty shift output for {:?}", m.key);
        }
    }

    #[test]
    fn test_every_mapping_sits_on_a_physical_key() {
        let model = KeyboardModel::qwerty();
        for m in INSCRIPT {
            let pk = model.physical_key_for(m.key);
            assert!(
                matches!(pk, Some(pk) if pk.base == m.key),
                "layout key {:?} is not the base symbol of any physical key",
                m.key
            );
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            TransliterationLayout::from_name("InScript").map(|l| l.kind),
            Some(LayoutKind::Inscript)
        );
        assert!(TransliterationLayout::from_name("remington").is_none());
    }

    #[test]
    fn test_every_kind_round_trips_through_its_name() {
        for &kind in LayoutKind::ALL {
            let layout = TransliterationLayout::new(kind);
            assert_eq!(LayoutKind::from_name(layout.name()), Some(kind));
        }
    }

    #[test]
    fn test_lookup() {
        let layout = TransliterationLayout::default();
        let k = layout.lookup('k').unwrap();
        assert_eq!(k.normal, "क");
        assert_eq!(k.shift, "ख");
        assert!(layout.lookup('K').is_none());
    }
}
