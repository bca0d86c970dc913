use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Snapshot of typing performance, recomputed from scratch on every change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingMetrics {
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    pub total_chars: usize,
    pub correct_chars: usize,
    /// Whole seconds since the session started, at least 1 once started.
    pub elapsed_time: u64,
    pub characters_per_second: f64,
}

/// Compute metrics for `typed` against `target` as of `now`.
///
/// Characters are compared position by position as Unicode scalar values.
/// Anything typed past the end of the target counts as an error. Words are
/// whitespace-delimited tokens of the typed text, not 5-character groups.
pub fn compute_metrics(
    target: &str,
    typed: &str,
    started_at: Option<Instant>,
    now: Instant,
) -> TypingMetrics {
    let Some(start) = started_at else {
        return TypingMetrics::default();
    };

    let elapsed_secs = now.saturating_duration_since(start).as_secs_f64().max(1.0);

    let mut target_chars = target.chars();
    let mut correct_chars = 0usize;
    let mut errors = 0usize;
    for typed_ch in typed.chars() {
        match target_chars.next() {
            Some(expected) if expected == typed_ch => correct_chars += 1,
            _ => errors += 1,
        }
    }
    let total_chars = correct_chars + errors;

    let total_words = typed.split_whitespace().count().max(1);
    let wpm = (total_words as f64 / elapsed_secs * 60.0).round() as u32;

    let accuracy = if total_chars > 0 {
        (correct_chars as f64 / total_chars as f64 * 100.0)
            .round()
            .clamp(0.0, 100.0) as u32
    } else {
        0
    };

    let characters_per_second = round2(correct_chars as f64 / elapsed_secs);

    TypingMetrics {
        wpm,
        accuracy,
        errors,
        total_chars,
        correct_chars,
        elapsed_time: elapsed_secs.floor() as u64,
        characters_per_second,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
