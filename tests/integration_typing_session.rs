use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use devtype::config::Config;
use devtype::engine::filter::ContentFilter;
use devtype::engine::metrics::compute_metrics;
use devtype::keyboard::layout::TransliterationLayout;
use devtype::keyboard::model::KeyboardModel;
use devtype::keyboard::transliterate::KeyResolver;
use devtype::session::lesson::LessonCatalog;
use devtype::session::progress::ProgressTracker;
use devtype::session::result::{EndReason, SessionResult};
use devtype::session::tracker::{SessionPhase, SessionTracker};
use devtype::store::json_store::JsonStore;
use devtype::store::schema::{HistoryData, ProgressData};

const HOME_ROW_KEYS: &str = "k l ; ' h j kh lh ;' h' j' kj lk hj";

fn first_lesson_text() -> String {
    let catalog = LessonCatalog::builtin().unwrap();
    catalog.get("home-row-consonants").unwrap().text.clone()
}

#[test]
fn home_row_keys_produce_first_lesson() {
    let model = KeyboardModel::qwerty();
    let layout = TransliterationLayout::default();
    let resolver = KeyResolver::new(&model, &layout);

    assert_eq!(resolver.transliterate_qwerty(HOME_ROW_KEYS), first_lesson_text());
}

#[test]
fn every_builtin_lesson_is_nfc_and_well_formed() {
    let catalog = LessonCatalog::builtin().unwrap();
    assert!(catalog.len() >= 9);
    for lesson in catalog.iter() {
        assert_eq!(devtype::text::nfc(&lesson.text), lesson.text, "{}", lesson.id);
        assert!(!lesson.title.is_empty());
    }
}

#[test]
fn builtin_lessons_pass_the_content_filter() {
    let catalog = LessonCatalog::builtin().unwrap();
    let filter = ContentFilter::builtin().unwrap();
    for lesson in catalog.iter() {
        assert!(
            !filter.contains_prohibited_words(&lesson.text).is_blocked,
            "{}",
            lesson.id
        );
    }
}

#[test]
fn full_attempt_updates_progress_and_history_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let config = Config::default();
    let catalog = LessonCatalog::builtin().unwrap();
    let lesson = catalog.get("home-row-consonants").unwrap();

    let model = KeyboardModel::qwerty();
    let layout = TransliterationLayout::default();
    let resolver = KeyResolver::new(&model, &layout);

    let t0 = Instant::now();
    let mut tracker = SessionTracker::new();
    tracker.start_at(&lesson.id, t0, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
    assert_eq!(tracker.phase(), SessionPhase::Running);

    let typed = resolver.transliterate_qwerty(HOME_ROW_KEYS);
    let end = t0 + Duration::from_secs(30);
    let metrics = tracker.metrics(&lesson.text, &typed, end);
    assert_eq!(metrics, compute_metrics(&lesson.text, &typed, Some(t0), end));
    assert_eq!(metrics.accuracy, 100);
    assert_eq!(metrics.errors, 0);
    // 14 words in 30 seconds
    assert_eq!(metrics.wpm, 28);

    let threshold = lesson.threshold(config.default_threshold());
    let passed = threshold.is_passed(&metrics);
    assert!(passed);

    let session = tracker
        .end_at(metrics, passed, end, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 30).unwrap())
        .unwrap();
    let result = SessionResult::from_session(session, EndReason::Finished, false).unwrap();

    let mut progress = ProgressTracker::new();
    progress.update_progress(&lesson.id, metrics.wpm, metrics.accuracy, passed);
    let mut history = HistoryData::default();
    history.push(result.clone());

    store.save_progress(&ProgressData::from_tracker(&progress)).unwrap();
    store.save_history(&history).unwrap();

    let reloaded = store.load_progress().into_tracker();
    let entry = reloaded.get(&lesson.id).unwrap();
    assert!(entry.completed);
    assert_eq!(entry.best_wpm, 28);
    assert_eq!(reloaded.progress_percentage(catalog.len()), 11);

    let reloaded_history = store.load_history();
    assert_eq!(reloaded_history.sessions, vec![result]);
}

#[test]
fn ended_tracker_reports_frozen_metrics() {
    let t0 = Instant::now();
    let mut tracker = SessionTracker::new();
    tracker.start_at("x", t0, Utc::now());
    let frozen = tracker.metrics("कक", "क", t0 + Duration::from_secs(2));
    tracker.end_at(frozen, false, t0 + Duration::from_secs(2), Utc::now());

    let later = tracker.metrics("कक", "कक", t0 + Duration::from_secs(60));
    assert_eq!(later, frozen);
    assert!(tracker.end(frozen, true).is_none());
}
