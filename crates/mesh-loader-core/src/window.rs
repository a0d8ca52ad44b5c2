//! Decision window state machine.
//!
//! [`ControllerState`] is a plain value: [`ControllerState::step`] consumes it
//! together with one input sample and returns the updated state. The
//! [`DecisionWindow`] owns that value for the boot cycle and adds the parts
//! with side effects: redraw throttling and the screen.

use embassy_time::{Duration, Instant};

use crate::countdown::Countdown;
use crate::debounce::{Debouncer, InputEvent, InputSample};
use crate::entity::Selection;
use crate::ports::Display;
use crate::screen::LoaderScreen;

/// Timing of the decision window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// How long the user may toggle the selection
    pub window_duration: Duration,
    /// Contact-bounce filter width
    pub debounce_interval: Duration,
    /// Minimum time between two redraws
    pub redraw_interval: Duration,
}

impl WindowConfig {
    pub const DEFAULT: Self = Self {
        window_duration: Duration::from_millis(2000),
        debounce_interval: Duration::from_millis(25),
        redraw_interval: Duration::from_millis(20),
    };
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Presenting,
    /// Window is over, the selection is final
    Committing,
}

/// Selection state of one boot cycle
#[derive(Debug, Clone, Copy)]
pub struct ControllerState {
    selection: Selection,
    debouncer: Debouncer,
    countdown: Countdown,
}

/// Result of [`ControllerState::step`]
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub state: ControllerState,
    pub phase: Phase,
    /// The sample toggled the selection
    pub toggled: bool,
    /// Time left in the window, clamped at zero
    pub remaining: Duration,
}

impl ControllerState {
    pub const fn new(selection: Selection, started: Instant, config: &WindowConfig) -> Self {
        Self {
            selection,
            debouncer: Debouncer::active_low(config.debounce_interval),
            countdown: Countdown::new(started, config.window_duration),
        }
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Advance the state machine by one sample of the button line.
    ///
    /// Once the window has expired input is no longer sampled and the
    /// selection is final.
    pub fn step(mut self, sample: InputSample) -> Step {
        if self.countdown.is_expired(sample.at) {
            return Step {
                state: self,
                phase: Phase::Committing,
                toggled: false,
                remaining: Duration::from_ticks(0),
            };
        }

        let toggled = self.debouncer.sample(sample) == InputEvent::Activated;
        if toggled {
            self.selection = self.selection.toggled();
        }

        Step {
            state: self,
            phase: Phase::Presenting,
            toggled,
            remaining: self.countdown.remaining(sample.at),
        }
    }
}

/// Outcome of one [`DecisionWindow::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTick {
    Presenting { toggled: bool },
    Expired(Selection),
}

/// Owning context of the decision window for one boot cycle
pub struct DecisionWindow {
    state: ControllerState,
    config: WindowConfig,
    last_redraw: Instant,
}

impl DecisionWindow {
    /// Open the window and draw the initial selection screen with a full bar.
    pub fn start<D: Display>(
        selection: Selection,
        now: Instant,
        config: WindowConfig,
        screen: &mut LoaderScreen<D>,
    ) -> Self {
        let _ = screen.show_selection(selection, config.window_duration, config.window_duration);

        Self {
            state: ControllerState::new(selection, now, &config),
            config,
            last_redraw: now,
        }
    }

    pub const fn selection(&self) -> Selection {
        self.state.selection()
    }

    pub fn tick<D: Display>(
        &mut self,
        sample: InputSample,
        screen: &mut LoaderScreen<D>,
    ) -> WindowTick {
        let step = self.state.step(sample);
        self.state = step.state;

        match step.phase {
            Phase::Committing => WindowTick::Expired(self.state.selection()),
            Phase::Presenting => {
                if self.redraw_due(sample.at) {
                    self.last_redraw = sample.at;
                    let _ = screen.show_selection(
                        self.state.selection(),
                        step.remaining,
                        self.config.window_duration,
                    );
                }
                WindowTick::Presenting {
                    toggled: step.toggled,
                }
            }
        }
    }

    fn redraw_due(&self, now: Instant) -> bool {
        now.checked_duration_since(self.last_redraw)
            .is_some_and(|since| since >= self.config.redraw_interval)
    }
}
