use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use devtype::config::Config;
use devtype::engine::filter::ContentFilter;
use devtype::engine::metrics::TypingMetrics;
use devtype::keyboard::layout::TransliterationLayout;
use devtype::keyboard::model::KeyboardModel;
use devtype::keyboard::transliterate::{KeyPress, KeyResolver};
use devtype::session::lesson::{Lesson, LessonCatalog, PassThreshold};
use devtype::session::progress::ProgressTracker;
use devtype::session::result::{EndReason, SessionResult};
use devtype::session::timer::{CountdownTimer, TickOutcome, TickSchedule};
use devtype::session::tracker::{SessionPhase, SessionTracker};
use devtype::store::json_store::JsonStore;
use devtype::store::schema::{HistoryData, ProgressData};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Typing,
    Result,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub catalog: LessonCatalog,
    pub progress: ProgressTracker,
    pub history: HistoryData,
    pub selected: usize,
    pub typed: String,
    /// Byte length of each key's output in `typed`, oldest first.
    pieces: Vec<usize>,
    pub live_metrics: TypingMetrics,
    pub warning: Option<String>,
    pub last_result: Option<SessionResult>,
    pub timer: CountdownTimer,
    pub timed: bool,
    pub should_quit: bool,
    filter: ContentFilter,
    keyboard_model: KeyboardModel,
    layout: TransliterationLayout,
    tracker: SessionTracker,
    schedule: TickSchedule,
    store: Option<JsonStore>,
}

impl App {
    pub fn new(config: Config, store: Option<JsonStore>) -> Result<Self> {
        let catalog = LessonCatalog::builtin().context("loading bundled lessons")?;
        Self::with_catalog(config, catalog, store)
    }

    pub fn with_catalog(
        config: Config,
        catalog: LessonCatalog,
        store: Option<JsonStore>,
    ) -> Result<Self> {
        let filter = ContentFilter::with_extra(&config.extra_prohibited_words)
            .context("building content filter")?;
        let theme = Theme::load(&config.theme).unwrap_or_else(|| {
            warn!(
                theme = %config.theme,
                available = ?Theme::available_themes(),
                "unknown theme, using default"
            );
            Theme::default()
        });
        let layout = TransliterationLayout::new(config.layout_kind());

        let (progress, history) = match &store {
            Some(s) => (s.load_progress().into_tracker(), s.load_history()),
            None => (ProgressTracker::new(), HistoryData::default()),
        };

        Ok(Self {
            screen: AppScreen::Menu,
            timer: CountdownTimer::new(config.timer_secs),
            timed: config.timed_mode,
            config,
            theme,
            catalog,
            progress,
            history,
            selected: 0,
            typed: String::new(),
            pieces: Vec::new(),
            live_metrics: TypingMetrics::default(),
            warning: None,
            last_result: None,
            should_quit: false,
            filter,
            keyboard_model: KeyboardModel::qwerty(),
            layout,
            tracker: SessionTracker::new(),
            schedule: TickSchedule::default(),
            store,
        })
    }

    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.catalog.by_index(self.selected)
    }

    pub fn threshold(&self) -> PassThreshold {
        let default = self.config.default_threshold();
        self.current_lesson()
            .map(|l| l.threshold(default))
            .unwrap_or(default)
    }

    pub fn layout_name(&self) -> &'static str {
        self.layout.name()
    }

    pub fn phase(&self) -> SessionPhase {
        self.tracker.phase()
    }

    /// Remaining seconds when the attempt is timed.
    pub fn time_remaining(&self) -> Option<u64> {
        self.timed.then_some(self.timer.time_remaining)
    }

    pub fn progress_percentage(&self) -> u32 {
        self.progress.progress_percentage(self.catalog.len())
    }

    pub fn select_lesson(&mut self, lesson_id: &str) -> bool {
        match self.catalog.position(lesson_id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    pub fn menu_next(&mut self) {
        if !self.catalog.is_empty() {
            self.selected = (self.selected + 1) % self.catalog.len();
        }
    }

    pub fn menu_prev(&mut self) {
        if !self.catalog.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.catalog.len() - 1);
        }
    }

    /// Open the selected lesson. The session starts on the first keystroke.
    pub fn start_lesson(&mut self) {
        let Some(lesson) = self.current_lesson() else {
            return;
        };
        let limit = lesson.time_limit_secs;
        self.timed = self.config.timed_mode || limit.is_some();
        self.timer = CountdownTimer::new(limit.unwrap_or(self.config.timer_secs));
        self.schedule.clear();
        self.tracker.reset();
        self.typed.clear();
        self.pieces.clear();
        self.live_metrics = TypingMetrics::default();
        self.warning = None;
        self.screen = AppScreen::Typing;
    }

    pub fn retry_lesson(&mut self) {
        self.start_lesson();
    }

    pub fn next_lesson(&mut self) {
        self.menu_next();
        self.start_lesson();
    }

    pub fn go_to_menu(&mut self) {
        self.timer.reset();
        self.schedule.clear();
        self.tracker.reset();
        self.typed.clear();
        self.pieces.clear();
        self.warning = None;
        self.screen = AppScreen::Menu;
    }

    pub fn type_key(&mut self, ch: char) {
        self.type_key_at(ch, Instant::now());
    }

    pub fn type_key_at(&mut self, ch: char, now: Instant) {
        if self.screen != AppScreen::Typing {
            return;
        }
        let Some(lesson_id) = self.current_lesson().map(|l| l.id.clone()) else {
            return;
        };
        match self.tracker.phase() {
            SessionPhase::Ended => return,
            SessionPhase::Idle => {
                self.tracker.start_at(&lesson_id, now, Utc::now());
                if self.timed {
                    self.timer.start();
                    self.schedule.arm(now);
                }
            }
            SessionPhase::Running => {
                if self.run_countdown(now) {
                    return;
                }
            }
        }

        let press = KeyPress::from_char(&self.keyboard_model, ch);
        let resolver = KeyResolver::new(&self.keyboard_model, &self.layout);
        let piece = resolver.map_key(&press.key, press.shift, press.code);
        self.typed.push_str(piece);
        self.pieces.push(piece.len());
        self.revalidate();
        self.refresh_metrics(now);

        let target_len = self.current_lesson().map_or(0, Lesson::char_count);
        if self.typed.chars().count() >= target_len {
            self.finish(EndReason::Finished, now);
        }
    }

    pub fn backspace(&mut self) {
        self.backspace_at(Instant::now());
    }

    /// Remove the output of the last key press, which may be several scalars.
    pub fn backspace_at(&mut self, now: Instant) {
        if self.screen != AppScreen::Typing || self.tracker.phase() != SessionPhase::Running {
            return;
        }
        if self.run_countdown(now) {
            return;
        }
        let Some(len) = self.pieces.pop() else {
            return;
        };
        self.typed.truncate(self.typed.len() - len);
        self.revalidate();
        self.refresh_metrics(now);
    }

    pub fn on_tick(&mut self) {
        self.on_tick_at(Instant::now());
    }

    pub fn on_tick_at(&mut self, now: Instant) {
        if self.screen != AppScreen::Typing || self.tracker.phase() != SessionPhase::Running {
            return;
        }
        self.refresh_metrics(now);
        self.run_countdown(now);
    }

    /// Feed elapsed cadence periods to the countdown. Returns true when the
    /// attempt ended because time ran out.
    fn run_countdown(&mut self, now: Instant) -> bool {
        for _ in 0..self.schedule.due_ticks(now) {
            if self.timer.tick() == TickOutcome::Completed {
                info!(duration_secs = self.timer.duration(), "countdown completed");
                self.finish(EndReason::TimeUp, now);
                return true;
            }
        }
        false
    }

    /// Esc on the typing screen: end a running attempt, or leave an untouched one.
    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn stop_at(&mut self, now: Instant) {
        match self.tracker.phase() {
            SessionPhase::Running => self.finish(EndReason::Stopped, now),
            _ => self.go_to_menu(),
        }
    }

    fn revalidate(&mut self) {
        let verdict = self.filter.contains_prohibited_words(&self.typed);
        if verdict.is_blocked && self.warning.is_none() {
            warn!(matched = ?verdict.matched_words, "typed text contains prohibited words");
        }
        let validation = self.filter.validate_typing_input(&self.typed);
        self.warning = (!validation.is_valid).then_some(validation.warning);
    }

    fn refresh_metrics(&mut self, now: Instant) {
        if let Some(lesson) = self.catalog.by_index(self.selected) {
            self.live_metrics = self.tracker.metrics(&lesson.text, &self.typed, now);
        }
    }

    fn finish(&mut self, reason: EndReason, now: Instant) {
        let threshold = self.threshold();
        let Some(lesson) = self.catalog.by_index(self.selected) else {
            return;
        };
        let metrics = self.tracker.metrics(&lesson.text, &self.typed, now);
        let blocked = self.filter.contains_prohibited_words(&self.typed).is_blocked;
        let passed = !blocked && threshold.is_passed(&metrics);

        self.timer.stop();
        self.schedule.clear();

        let Some(result) = self
            .tracker
            .end_at(metrics, passed, now, Utc::now())
            .and_then(|session| SessionResult::from_session(session, reason, blocked))
        else {
            return;
        };

        info!(
            lesson_id = %result.lesson_id,
            reason = reason.as_str(),
            blocked,
            "attempt finished"
        );
        self.progress
            .update_progress(&result.lesson_id, metrics.wpm, metrics.accuracy, passed);
        self.history.push(result.clone());
        self.persist();

        self.live_metrics = metrics;
        self.last_result = Some(result);
        self.screen = AppScreen::Result;
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save_progress(&ProgressData::from_tracker(&self.progress)) {
            warn!(error = %e, "failed to save progress");
        }
        if let Err(e) = store.save_history(&self.history) {
            warn!(error = %e, "failed to save history");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    const LESSONS: &str = r#"
[[lesson]]
id = "ka"
title = "Ka"
text = "कक"
pass = { min_wpm = 1, min_accuracy = 90 }

[[lesson]]
id = "timed"
title = "Timed"
text = "कतचटप"
time_limit_secs = 3
"#;

    fn test_app(store: Option<JsonStore>) -> App {
        let catalog =
            LessonCatalog::from_sources([("test.toml".to_string(), LESSONS.to_string())]).unwrap();
        App::with_catalog(Config::default(), catalog, store).unwrap()
    }

    #[test]
    fn test_typing_whole_lesson_finishes_and_passes() {
        let mut app = test_app(None);
        app.start_lesson();
        let t0 = Instant::now();
        app.type_key_at('k', t0);
        assert_eq!(app.phase(), SessionPhase::Running);
        app.type_key_at('k', t0 + Duration::from_secs(2));

        assert_eq!(app.screen, AppScreen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.end_reason, EndReason::Finished);
        assert_eq!(result.metrics.accuracy, 100);
        assert!(result.passed);
        assert!(app.progress.get("ka").unwrap().completed);
        assert_eq!(app.history.sessions.len(), 1);
    }

    #[test]
    fn test_backspace_and_mistakes() {
        let mut app = test_app(None);
        app.start_lesson();
        let t0 = Instant::now();
        app.type_key_at('j', t0);
        assert_eq!(app.typed, "र");
        app.backspace();
        assert_eq!(app.typed, "");
        app.type_key_at('l', t0);
        app.type_key_at('k', t0 + Duration::from_secs(1));
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.metrics.errors, 1);
        assert!(!result.passed);
    }

    #[test]
    fn test_stop_before_typing_returns_to_menu() {
        let mut app = test_app(None);
        app.start_lesson();
        app.stop();
        assert_eq!(app.screen, AppScreen::Menu);
        assert!(app.last_result.is_none());
        assert!(app.history.sessions.is_empty());
    }

    #[test]
    fn test_stop_mid_attempt_records_stopped_result() {
        let mut app = test_app(None);
        app.start_lesson();
        let t0 = Instant::now();
        app.type_key_at('k', t0);
        app.stop_at(t0 + Duration::from_secs(1));
        assert_eq!(app.screen, AppScreen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.end_reason, EndReason::Stopped);
        assert_eq!(app.progress.get("ka").unwrap().attempts, 1);
    }

    #[test]
    fn test_countdown_ends_attempt() {
        let mut app = test_app(None);
        assert!(app.select_lesson("timed"));
        app.start_lesson();
        assert_eq!(app.time_remaining(), Some(3));
        let t0 = Instant::now();
        app.type_key_at('k', t0);
        app.on_tick_at(t0 + Duration::from_millis(1100));
        assert_eq!(app.time_remaining(), Some(2));
        app.on_tick_at(t0 + Duration::from_millis(3100));
        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.last_result.as_ref().unwrap().end_reason, EndReason::TimeUp);
    }

    #[test]
    fn test_countdown_ends_attempt_during_steady_typing() {
        let mut app = test_app(None);
        assert!(app.select_lesson("timed"));
        app.start_lesson();
        let t0 = Instant::now();
        // No idle tick between keys
        app.type_key_at('k', t0);
        app.type_key_at('l', t0 + Duration::from_millis(1200));
        app.type_key_at(';', t0 + Duration::from_millis(2400));
        app.type_key_at('\'', t0 + Duration::from_millis(3600));

        assert_eq!(app.screen, AppScreen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.end_reason, EndReason::TimeUp);
        assert_eq!(app.typed, "कतच");

        app.type_key_at('h', t0 + Duration::from_millis(4800));
        assert_eq!(app.typed, "कतच");
        assert_eq!(app.history.sessions.len(), 1);
    }

    #[test]
    fn test_backspace_after_countdown_expiry_ends_attempt() {
        let mut app = test_app(None);
        assert!(app.select_lesson("timed"));
        app.start_lesson();
        let t0 = Instant::now();
        app.type_key_at('k', t0);
        app.backspace_at(t0 + Duration::from_secs(5));
        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.typed, "क");
        assert_eq!(app.last_result.as_ref().unwrap().end_reason, EndReason::TimeUp);
    }

    #[test]
    fn test_backspace_removes_whole_key_output() {
        let mut app = test_app(None);
        assert!(app.select_lesson("timed"));
        app.start_lesson();
        let t0 = Instant::now();
        app.type_key_at('k', t0);
        // Shift-5 types the three-scalar conjunct ज्ञ
        app.type_key_at('%', t0 + Duration::from_millis(100));
        assert_eq!(app.typed, "क\u{091C}\u{094D}\u{091E}");
        assert_eq!(app.live_metrics.total_chars, 4);

        app.backspace_at(t0 + Duration::from_millis(200));
        assert_eq!(app.typed, "क");
        assert_eq!(app.live_metrics.total_chars, 1);
        assert_eq!(app.live_metrics.errors, 0);

        app.backspace_at(t0 + Duration::from_millis(300));
        app.backspace_at(t0 + Duration::from_millis(400));
        assert_eq!(app.typed, "");
        assert_eq!(app.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_blocked_text_never_passes() {
        let mut config = Config::default();
        config.min_wpm = 0;
        config.min_accuracy = 0;
        config.extra_prohibited_words = vec!["कक".to_string()];
        let catalog =
            LessonCatalog::from_sources([("t.toml".to_string(), LESSONS.to_string())]).unwrap();
        let mut app = App::with_catalog(config, catalog, None).unwrap();
        app.start_lesson();
        let t0 = Instant::now();
        app.type_key_at('k', t0);
        assert!(app.warning.is_none());
        app.type_key_at('k', t0 + Duration::from_secs(1));
        let result = app.last_result.as_ref().unwrap();
        assert!(result.blocked);
        assert!(!result.passed);
        assert!(app.warning.is_some());
    }

    #[test]
    fn test_results_are_persisted() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = test_app(Some(store));
        app.start_lesson();
        let t0 = Instant::now();
        app.type_key_at('k', t0);
        app.type_key_at('k', t0 + Duration::from_secs(2));

        let reopened = test_app(Some(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap()));
        assert_eq!(reopened.progress.get("ka").unwrap().attempts, 1);
        assert_eq!(reopened.history.sessions.len(), 1);
        assert_eq!(reopened.progress_percentage(), 50);
    }

    #[test]
    fn test_menu_wraps() {
        let mut app = test_app(None);
        app.menu_prev();
        assert_eq!(app.selected, 1);
        app.menu_next();
        assert_eq!(app.selected, 0);
    }
}
