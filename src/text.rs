use std::borrow::Cow;

use icu_normalizer::ComposingNormalizerBorrowed;

/// NFC-normalize text.
///
/// Devanagari nukta letters such as क़ are composition exclusions, so NFC
/// leaves them as base letter + nukta, which is also what the InScript
/// layout produces key by key.
pub fn nfc(text: &str) -> Cow<'_, str> {
    ComposingNormalizerBorrowed::new_nfc().normalize(text)
}
