use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::metrics::{self, TypingMetrics};

/// One attempt at a lesson.
#[derive(Clone, Debug, PartialEq)]
pub struct TypingSession {
    pub session_id: Uuid,
    pub lesson_id: String,
    /// Monotonic start, used for metrics.
    pub started_at: Instant,
    /// Wall-clock start, used for history.
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub ended_at: Option<Instant>,
    pub metrics: Option<TypingMetrics>,
    pub passed: bool,
}

impl TypingSession {
    fn new(lesson_id: &str, started_at: Instant, start_time: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            lesson_id: lesson_id.to_string(),
            started_at,
            start_time,
            end_time: None,
            ended_at: None,
            metrics: None,
            passed: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Ended,
}

/// Lifecycle of the current attempt: Idle -> Running -> Ended.
///
/// Pass/fail is decided by the caller and handed to [`SessionTracker::end`].
#[derive(Clone, Debug, Default)]
pub struct SessionTracker {
    session: Option<TypingSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.session {
            None => SessionPhase::Idle,
            Some(s) if s.end_time.is_some() => SessionPhase::Ended,
            Some(_) => SessionPhase::Running,
        }
    }

    pub fn session(&self) -> Option<&TypingSession> {
        self.session.as_ref()
    }

    pub fn start(&mut self, lesson_id: &str) -> &TypingSession {
        self.start_at(lesson_id, Instant::now(), Utc::now())
    }

    /// Begin a new attempt. Starting while running restarts: the running
    /// attempt is discarded.
    pub fn start_at(
        &mut self,
        lesson_id: &str,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> &TypingSession {
        if let Some(running) = self.session.as_ref().filter(|s| s.end_time.is_none()) {
            warn!(
                session_id = %running.session_id,
                lesson_id = %running.lesson_id,
                "session restarted before it ended"
            );
        }
        let session = TypingSession::new(lesson_id, now, wall);
        info!(session_id = %session.session_id, lesson_id, "session started");
        self.session.insert(session)
    }

    pub fn end(&mut self, final_metrics: TypingMetrics, passed: bool) -> Option<&TypingSession> {
        self.end_at(final_metrics, passed, Instant::now(), Utc::now())
    }

    /// Finish the running attempt. Returns `None` unless a session is running.
    pub fn end_at(
        &mut self,
        final_metrics: TypingMetrics,
        passed: bool,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> Option<&TypingSession> {
        let session = self.session.as_mut().filter(|s| s.end_time.is_none())?;
        session.end_time = Some(wall);
        session.ended_at = Some(now);
        session.metrics = Some(final_metrics);
        session.passed = passed;
        info!(
            session_id = %session.session_id,
            lesson_id = %session.lesson_id,
            wpm = final_metrics.wpm,
            accuracy = final_metrics.accuracy,
            passed,
            "session ended"
        );
        Some(&*session)
    }

    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Metrics for the running attempt as of `now`; recorded metrics once ended.
    pub fn metrics(&self, target: &str, typed: &str, now: Instant) -> TypingMetrics {
        match &self.session {
            None => TypingMetrics::default(),
            Some(s) => match (s.metrics, s.ended_at) {
                (Some(m), Some(_)) => m,
                _ => metrics::compute_metrics(target, typed, Some(s.started_at), now),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut tracker = SessionTracker::new();
        assert_eq!(tracker.phase(), SessionPhase::Idle);

        let id = tracker.start("lesson1").session_id;
        assert_eq!(tracker.phase(), SessionPhase::Running);

        let m = TypingMetrics {
            wpm: 30,
            accuracy: 95,
            ..Default::default()
        };
        let ended = tracker.end(m, true).unwrap();
        assert_eq!(ended.session_id, id);
        assert_eq!(ended.metrics, Some(m));
        assert!(ended.passed);
        assert!(ended.end_time.is_some());
        assert_eq!(tracker.phase(), SessionPhase::Ended);

        tracker.reset();
        assert_eq!(tracker.phase(), SessionPhase::Idle);
        assert!(tracker.session().is_none());
    }

    #[test]
    fn test_end_requires_running_session() {
        let mut tracker = SessionTracker::new();
        assert!(tracker.end(TypingMetrics::default(), true).is_none());

        tracker.start("a");
        tracker.end(TypingMetrics::default(), false);
        assert!(tracker.end(TypingMetrics::default(), true).is_none());
        assert!(!tracker.session().unwrap().passed);
    }

    #[test]
    fn test_start_after_end_clears_previous_result() {
        let mut tracker = SessionTracker::new();
        tracker.start("a");
        tracker.end(TypingMetrics::default(), true);
        let s = tracker.start("a");
        assert!(s.end_time.is_none());
        assert!(s.metrics.is_none());
        assert!(!s.passed);
    }

    #[test]
    fn test_start_while_running_restarts() {
        let mut tracker = SessionTracker::new();
        let t0 = Instant::now();
        let first = tracker.start_at("a", t0, Utc::now()).session_id;
        let later = t0 + Duration::from_secs(10);
        let second = tracker.start_at("a", later, Utc::now());
        assert_ne!(second.session_id, first);
        assert_eq!(second.started_at, later);
        assert_eq!(tracker.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_metrics_follow_phase() {
        let mut tracker = SessionTracker::new();
        let t0 = Instant::now();
        assert_eq!(tracker.metrics("ab", "ab", t0), TypingMetrics::default());

        tracker.start_at("a", t0, Utc::now());
        let live = tracker.metrics("the cat sat", "the cat sit", t0 + Duration::from_secs(6));
        assert_eq!(live.wpm, 30);
        assert_eq!(live.accuracy, 91);

        tracker.end_at(live, false, t0 + Duration::from_secs(6), Utc::now());
        let frozen = tracker.metrics("the cat sat", "the cat sit", t0 + Duration::from_secs(60));
        assert_eq!(frozen, live);
    }
}
