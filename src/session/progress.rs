use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Best-score record for one lesson.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub attempts: u32,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub completed: bool,
    /// First time an attempt passed. Later passes do not move it.
    pub completed_date: Option<DateTime<Utc>>,
}

impl LessonProgress {
    fn record(&mut self, wpm: u32, accuracy: u32, passed: bool, now: DateTime<Utc>) {
        self.attempts += 1;
        self.best_wpm = self.best_wpm.max(wpm);
        self.best_accuracy = self.best_accuracy.max(accuracy);
        if passed && !self.completed {
            self.completed_date = Some(now);
        }
        self.completed |= passed;
    }
}

/// Per-lesson progress, keyed by lesson id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    lessons: HashMap<String, LessonProgress>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lessons(lessons: HashMap<String, LessonProgress>) -> Self {
        Self { lessons }
    }

    pub fn lessons(&self) -> &HashMap<String, LessonProgress> {
        &self.lessons
    }

    pub fn get(&self, lesson_id: &str) -> Option<&LessonProgress> {
        self.lessons.get(lesson_id)
    }

    pub fn update_progress(
        &mut self,
        lesson_id: &str,
        wpm: u32,
        accuracy: u32,
        passed: bool,
    ) -> &LessonProgress {
        self.update_progress_at(lesson_id, wpm, accuracy, passed, Utc::now())
    }

    /// Record one attempt. Unknown ids start a fresh record.
    pub fn update_progress_at(
        &mut self,
        lesson_id: &str,
        wpm: u32,
        accuracy: u32,
        passed: bool,
        now: DateTime<Utc>,
    ) -> &LessonProgress {
        let progress = self.lessons.entry(lesson_id.to_string()).or_default();
        progress.record(wpm, accuracy, passed, now);
        debug!(
            lesson_id,
            attempts = progress.attempts,
            best_wpm = progress.best_wpm,
            best_accuracy = progress.best_accuracy,
            completed = progress.completed,
            "progress updated"
        );
        progress
    }

    pub fn completed_count(&self) -> usize {
        self.lessons.values().filter(|p| p.completed).count()
    }

    /// Whole-number percentage of `total_lessons` completed.
    pub fn progress_percentage(&self, total_lessons: usize) -> u32 {
        if total_lessons == 0 {
            return 0;
        }
        (self.completed_count() as f64 / total_lessons as f64 * 100.0).round() as u32
    }
}
