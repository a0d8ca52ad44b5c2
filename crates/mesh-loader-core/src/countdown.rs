use embassy_time::{Duration, Instant};

/// Decision window clock.
///
/// Created once per boot and never restarted; the window is over once the
/// elapsed time is strictly greater than its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    started: Instant,
    duration: Duration,
}

impl Countdown {
    pub const fn new(started: Instant, duration: Duration) -> Self {
        Self { started, duration }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.checked_duration_since(self.started)
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Time left in the window, clamped at zero
    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .checked_sub(self.elapsed(now))
            .unwrap_or(Duration::from_ticks(0))
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.elapsed(now) > self.duration
    }
}
