use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::metrics::TypingMetrics;
use crate::session::tracker::TypingSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The whole target text was typed.
    Finished,
    /// The countdown ran out.
    TimeUp,
    /// The user stopped the attempt.
    Stopped,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::Finished => "finished",
            EndReason::TimeUp => "time up",
            EndReason::Stopped => "stopped",
        }
    }
}

/// A finished attempt, as kept in history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: Uuid,
    pub lesson_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub metrics: TypingMetrics,
    pub passed: bool,
    pub end_reason: EndReason,
    #[serde(default)]
    pub blocked: bool,
}

impl SessionResult {
    /// Returns `None` for a session that has not ended.
    pub fn from_session(
        session: &TypingSession,
        end_reason: EndReason,
        blocked: bool,
    ) -> Option<Self> {
        Some(Self {
            session_id: session.session_id,
            lesson_id: session.lesson_id.clone(),
            started_at: session.start_time,
            ended_at: session.end_time?,
            metrics: session.metrics?,
            passed: session.passed,
            end_reason,
            blocked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tracker::SessionTracker;

    #[test]
    fn test_running_session_has_no_result() {
        let mut tracker = SessionTracker::new();
        let session = tracker.start("a");
        assert!(SessionResult::from_session(session, EndReason::Stopped, false).is_none());
    }

    #[test]
    fn test_result_from_ended_session() {
        let mut tracker = SessionTracker::new();
        tracker.start("a");
        let metrics = TypingMetrics {
            wpm: 12,
            accuracy: 97,
            ..Default::default()
        };
        let session = tracker.end(metrics, true).unwrap();
        let result = SessionResult::from_session(session, EndReason::Finished, false).unwrap();
        assert_eq!(result.lesson_id, "a");
        assert_eq!(result.metrics, metrics);
        assert!(result.passed);
        assert!(result.ended_at >= result.started_at);
    }

    #[test]
    fn test_end_reason_serializes_snake_case() {
        let json = serde_json::to_string(&EndReason::TimeUp).unwrap();
        assert_eq!(json, "\"time_up\"");
    }
}
