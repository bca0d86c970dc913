use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::progress::{LessonProgress, ProgressTracker};
use crate::session::result::SessionResult;

const SCHEMA_VERSION: u32 = 1;

/// Oldest sessions are dropped past this many.
pub const MAX_HISTORY: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    pub lessons: HashMap<String, LessonProgress>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            lessons: HashMap::new(),
        }
    }
}

impl ProgressData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn from_tracker(tracker: &ProgressTracker) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            lessons: tracker.lessons().clone(),
        }
    }

    pub fn into_tracker(self) -> ProgressTracker {
        ProgressTracker::from_lessons(self.lessons)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub sessions: Vec<SessionResult>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

impl HistoryData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn push(&mut self, result: SessionResult) {
        self.sessions.push(result);
        if self.sessions.len() > MAX_HISTORY {
            let excess = self.sessions.len() - MAX_HISTORY;
            self.sessions.drain(..excess);
        }
    }

    /// Most recent sessions for one lesson, newest first.
    pub fn for_lesson<'a>(&'a self, lesson_id: &'a str) -> impl Iterator<Item = &'a SessionResult> {
        self.sessions
            .iter()
            .rev()
            .filter(move |s| s.lesson_id == lesson_id)
    }
}
