use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::store::schema::{HistoryData, ProgressData};

const PROGRESS_FILE: &str = "progress.json";
const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("devtype");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data directory {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Absent files give a default; unreadable ones are logged and replaced
    /// by a default.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));
        match parsed {
            Ok(data) => data,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "discarding unreadable data file");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    pub fn load_progress(&self) -> ProgressData {
        let data: ProgressData = self.load(PROGRESS_FILE);
        if data.needs_reset() {
            warn!(version = data.schema_version, "progress schema changed, starting fresh");
            return ProgressData::default();
        }
        data
    }

    pub fn save_progress(&self, data: &ProgressData) -> Result<()> {
        self.save(PROGRESS_FILE, data)
    }

    pub fn load_history(&self) -> HistoryData {
        let data: HistoryData = self.load(HISTORY_FILE);
        if data.needs_reset() {
            warn!(version = data.schema_version, "history schema changed, starting fresh");
            return HistoryData::default();
        }
        data
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    use super::*;
    use crate::engine::metrics::TypingMetrics;
    use crate::session::progress::ProgressTracker;
    use crate::session::result::{EndReason, SessionResult};
    use crate::store::schema::MAX_HISTORY;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn result(lesson_id: &str) -> SessionResult {
        SessionResult {
            session_id: Uuid::new_v4(),
            lesson_id: lesson_id.to_string(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            metrics: TypingMetrics::default(),
            passed: false,
            end_reason: EndReason::Stopped,
            blocked: false,
        }
    }

    #[test]
    fn test_missing_files_load_defaults() {
        let (_dir, store) = make_test_store();
        assert!(store.load_progress().lessons.is_empty());
        assert!(store.load_history().sessions.is_empty());
    }

    #[test]
    fn test_progress_round_trip() {
        let (_dir, store) = make_test_store();
        let mut tracker = ProgressTracker::new();
        tracker.update_progress("a", 30, 95, true);
        store.save_progress(&ProgressData::from_tracker(&tracker)).unwrap();

        let loaded = store.load_progress().into_tracker();
        assert_eq!(loaded, tracker);
        assert!(!store.file_path("progress.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(PROGRESS_FILE), "{ not json").unwrap();
        assert_eq!(store.load_progress(), ProgressData::default());
    }

    #[test]
    fn test_stale_schema_is_reset() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.file_path(PROGRESS_FILE),
            concat!(
                r#"{"schema_version": 99, "lessons": {"a": {"attempts": 1, "best_wpm": 1, "#,
                r#""best_accuracy": 1, "completed": false, "completed_date": null}}}"#,
            ),
        )
        .unwrap();
        assert!(store.load_progress().lessons.is_empty());
    }

    #[test]
    fn test_history_is_capped() {
        let (_dir, store) = make_test_store();
        let mut history = HistoryData::default();
        for _ in 0..MAX_HISTORY + 3 {
            history.push(result("a"));
        }
        history.push(result("b"));
        store.save_history(&history).unwrap();

        let loaded = store.load_history();
        assert_eq!(loaded.sessions.len(), MAX_HISTORY);
        assert_eq!(loaded.sessions.last().unwrap().lesson_id, "b");
        assert_eq!(loaded.for_lesson("b").count(), 1);
    }
}
