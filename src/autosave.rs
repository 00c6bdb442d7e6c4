use std::time::Duration;

pub const AUTOSAVE_PERIOD: Duration = Duration::from_secs(30);

/// The recurring autosave timer.
///
/// The shell turns an armed timer into a single subscription, so arming twice
/// still yields one timer and disarming drops it before the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveTimer {
    period: Duration,
    armed: bool,
}

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self::new(AUTOSAVE_PERIOD)
    }
}

impl AutosaveTimer {
    pub fn new(period: Duration) -> Self {
        Self { period, armed: false }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of recurring timers this represents: zero or one.
    pub fn active_timers(&self) -> usize {
        usize::from(self.armed)
    }

    /// Returns `true` when a timer was started, `false` if one was already running.
    pub fn arm(&mut self) -> bool {
        let started = !self.armed;
        self.armed = true;
        started
    }

    /// Returns `true` when a running timer was cancelled.
    pub fn disarm(&mut self) -> bool {
        std::mem::replace(&mut self.armed, false)
    }
}
