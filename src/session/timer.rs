use std::time::{Duration, Instant};

/// Outcome of advancing a countdown by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Idle,
    Running { remaining: u64 },
    /// The countdown just reached zero. Reported once per run.
    Completed,
}

/// Countdown for fixed-duration attempts, in whole seconds.
///
/// The timer owns no scheduling: whoever drives it calls [`tick`] once per
/// second while it is active. See [`TickSchedule`] for an event-loop helper.
///
/// [`tick`]: CountdownTimer::tick
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountdownTimer {
    duration: u64,
    pub time_remaining: u64,
    pub is_active: bool,
    pub is_complete: bool,
}

impl CountdownTimer {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration: duration_secs,
            time_remaining: duration_secs,
            is_active: false,
            is_complete: false,
        }
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn start(&mut self) {
        self.time_remaining = self.duration;
        self.is_active = true;
        self.is_complete = false;
    }

    /// Pause without completing.
    pub fn stop(&mut self) {
        self.is_active = false;
    }

    pub fn reset(&mut self) {
        self.time_remaining = self.duration;
        self.is_active = false;
        self.is_complete = false;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active {
            return TickOutcome::Idle;
        }
        if self.time_remaining <= 1 {
            self.time_remaining = 0;
            self.is_active = false;
            self.is_complete = true;
            return TickOutcome::Completed;
        }
        self.time_remaining -= 1;
        TickOutcome::Running {
            remaining: self.time_remaining,
        }
    }
}

/// Turns a fast, irregular event-loop tick into a one-second cadence.
///
/// Clearing the schedule cancels it; no further ticks are produced until it
/// is armed again.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickSchedule {
    next_due: Option<Instant>,
}

const CADENCE: Duration = Duration::from_secs(1);

impl TickSchedule {
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + CADENCE);
    }

    pub fn clear(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of whole cadence periods that elapsed up to `now`.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut ticks = 0;
        while due <= now {
            ticks += 1;
            due += CADENCE;
        }
        self.next_due = Some(due);
        ticks
    }
}
