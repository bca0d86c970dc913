use std::collections::HashSet;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::metrics::TypingMetrics;
use crate::text::nfc;

#[derive(Embed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("lesson file {file} is not valid UTF-8")]
    Encoding { file: String },
    #[error("failed to parse lesson file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate lesson id {0:?}")]
    DuplicateId(String),
    #[error("lesson {0:?} has no text")]
    EmptyText(String),
}

/// Minimum result for an attempt to count as passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassThreshold {
    pub min_wpm: u32,
    pub min_accuracy: u32,
}

impl PassThreshold {
    pub fn is_passed(&self, metrics: &TypingMetrics) -> bool {
        metrics.wpm >= self.min_wpm && metrics.accuracy >= self.min_accuracy
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub pass: Option<PassThreshold>,
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
}

impl Lesson {
    /// The lesson's own threshold, or `default` when it declares none.
    pub fn threshold(&self, default: PassThreshold) -> PassThreshold {
        self.pass.unwrap_or(default)
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Deserialize)]
struct LessonFile {
    #[serde(default)]
    lesson: Vec<Lesson>,
}

#[derive(Clone, Debug, Default)]
pub struct LessonCatalog {
    lessons: Vec<Lesson>,
}

impl LessonCatalog {
    /// Lessons bundled into the binary, ordered by file name.
    pub fn builtin() -> Result<Self, LessonError> {
        let mut names: Vec<String> = LessonAssets::iter()
            .filter(|f| f.ends_with(".toml"))
            .map(|f| f.into_owned())
            .collect();
        names.sort();

        let mut sources = Vec::with_capacity(names.len());
        for name in names {
            let Some(file) = LessonAssets::get(&name) else {
                continue;
            };
            let content = std::str::from_utf8(file.data.as_ref())
                .map_err(|_| LessonError::Encoding { file: name.clone() })?
                .to_string();
            sources.push((name, content));
        }
        Self::from_sources(sources)
    }

    /// Parse `(file name, TOML content)` pairs in order.
    pub fn from_sources<I>(sources: I) -> Result<Self, LessonError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut ids = HashSet::new();
        let mut lessons = Vec::new();
        for (file, content) in sources {
            let parsed: LessonFile =
                toml::from_str(&content).map_err(|source| LessonError::Parse { file, source })?;
            for mut lesson in parsed.lesson {
                lesson.text = nfc(lesson.text.trim()).into_owned();
                if lesson.text.is_empty() {
                    return Err(LessonError::EmptyText(lesson.id));
                }
                if !ids.insert(lesson.id.clone()) {
                    return Err(LessonError::DuplicateId(lesson.id));
                }
                lessons.push(lesson);
            }
        }
        Ok(Self { lessons })
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.lessons.iter().position(|l| l.id == id)
    }

    pub fn by_index(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }
}
