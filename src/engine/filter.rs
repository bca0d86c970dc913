use std::collections::HashSet;

use regex::Regex;
use thiserror::Error;

use crate::text::nfc;

const BUILTIN_TERMS: &str = include_str!("../../assets/filter/prohibited.txt");

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid prohibited term {term:?}: {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterVerdict {
    pub is_blocked: bool,
    /// Matched list entries, in list order.
    pub matched_words: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputValidation {
    pub is_valid: bool,
    /// Empty when valid.
    pub warning: String,
}

#[derive(Clone, Debug)]
struct Term {
    word: String,
    lowered: String,
    whole_word: Regex,
}

/// Flags text containing any of a fixed list of disallowed terms.
///
/// A term matches when it occurs as a case-insensitive substring or as a
/// case-insensitive whole word. Terms are compiled once at construction.
#[derive(Clone, Debug)]
pub struct ContentFilter {
    terms: Vec<Term>,
}

impl ContentFilter {
    /// Build from a term list. Blank entries are skipped and entries that
    /// differ only by letter case collapse to the first one.
    pub fn new<I, S>(words: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for word in words {
            let word = nfc(word.as_ref().trim()).into_owned();
            if word.is_empty() {
                continue;
            }
            let lowered = word.to_lowercase();
            if !seen.insert(lowered.clone()) {
                continue;
            }
            let whole_word = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&word)))
                .map_err(|source| FilterError::Pattern {
                    term: word.clone(),
                    source,
                })?;
            terms.push(Term {
                word,
                lowered,
                whole_word,
            });
        }
        Ok(Self { terms })
    }

    /// The bundled English and Hindi list.
    pub fn builtin() -> Result<Self, FilterError> {
        Self::with_extra(&[])
    }

    /// The bundled list followed by `extra` terms.
    pub fn with_extra(extra: &[String]) -> Result<Self, FilterError> {
        let builtin = BUILTIN_TERMS
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        Self::new(builtin.chain(extra.iter().map(String::as_str)))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains_prohibited_words(&self, text: &str) -> FilterVerdict {
        let text = nfc(text);
        let lowered = text.to_lowercase();
        let matched_words: Vec<String> = self
            .terms
            .iter()
            .filter(|t| lowered.contains(&t.lowered) || t.whole_word.is_match(&text))
            .map(|t| t.word.clone())
            .collect();
        FilterVerdict {
            is_blocked: !matched_words.is_empty(),
            matched_words,
        }
    }

    pub fn validate_typing_input(&self, text: &str) -> InputValidation {
        let verdict = self.contains_prohibited_words(text);
        if verdict.is_blocked {
            InputValidation {
                is_valid: false,
                warning: format!(
                    "Your text contains words that are not allowed: {}. \
                     Please remove them to continue.",
                    verdict.matched_words.join(", ")
                ),
            }
        } else {
            InputValidation {
                is_valid: true,
                warning: String::new(),
            }
        }
    }
}
