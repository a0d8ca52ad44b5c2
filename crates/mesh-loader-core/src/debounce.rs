//! Button contact-bounce filter.
//!
//! The line is sampled on every loop iteration. A level has to stay
//! unchanged for longer than the debounce interval before it counts, and a
//! press only re-arms after a stable release, so one physical
//! press-and-release yields exactly one [`InputEvent::Activated`].

use embassy_time::{Duration, Instant};

/// Raw level of the button line at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSample {
    /// `true` when the line reads electrically high
    pub level: bool,
    pub at: Instant,
}

impl InputSample {
    pub const fn new(level: bool, at: Instant) -> Self {
        Self { level, at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    None,
    Activated,
}

#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    interval: Duration,
    pressed_level: bool,
    last_level: bool,
    last_change: Instant,
    activated: bool,
}

impl Debouncer {
    /// Create a debouncer for a line that reads `pressed_level` while pressed.
    ///
    /// The line is assumed to have been at the pressed level since time zero,
    /// so a button held through power-on produces one activation.
    pub const fn new(interval: Duration, pressed_level: bool) -> Self {
        Self {
            interval,
            pressed_level,
            last_level: pressed_level,
            last_change: Instant::from_ticks(0),
            activated: false,
        }
    }

    /// Debouncer for a pulled-up button that shorts the line to ground
    pub const fn active_low(interval: Duration) -> Self {
        Self::new(interval, false)
    }

    /// Feed one sample of the line
    pub fn sample(&mut self, sample: InputSample) -> InputEvent {
        if sample.level != self.last_level {
            self.last_level = sample.level;
            self.last_change = sample.at;
        }

        let stable_for = sample
            .at
            .checked_duration_since(self.last_change)
            .unwrap_or(Duration::from_ticks(0));
        if stable_for <= self.interval {
            return InputEvent::None;
        }

        if sample.level == self.pressed_level {
            if !self.activated {
                self.activated = true;
                return InputEvent::Activated;
            }
        } else {
            self.activated = false;
        }

        InputEvent::None
    }

    /// Whether the current press has already been reported
    pub const fn is_latched(&self) -> bool {
        self.activated
    }
}
