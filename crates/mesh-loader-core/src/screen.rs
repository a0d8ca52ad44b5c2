//! Loader screens.
//!
//! Layout of every screen:
//!
//! ```text
//! Mesh Loader            <- title, small
//! Meshcore               <- heading, large
//! Press btn to change    <- status, small
//! ███████████            <- progress bar (selection screen only)
//! ```

use embassy_time::Duration;

use crate::entity::Selection;
use crate::ports::{Display, DisplayError, TextSize};

pub const TITLE: &str = "Mesh Loader";
pub const SELECTION_HINT: &str = "Press btn to change";
pub const BOOTING: &str = "Booting...";
pub const ERROR_HEADING: &str = "Error";

const TITLE_Y: u16 = 0;
const HEADING_Y: u16 = 15;
const STATUS_Y: u16 = 35;

/// Filled rectangle in display pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Progress bar along the bottom edge.
///
/// The bar takes a tenth of the display height (rounded up) and shrinks from
/// the full width to zero as `remaining` goes from `window` to zero. Its
/// width is rounded down.
pub fn progress_bar(width: u16, height: u16, remaining: Duration, window: Duration) -> Bar {
    let bar_height = height.div_ceil(10);
    let window_ms = window.as_millis();
    let remaining_ms = remaining.as_millis().min(window_ms);

    let bar_width = if window_ms == 0 {
        0
    } else {
        u64::from(width) * remaining_ms / window_ms
    };

    Bar {
        x: 0,
        y: height - bar_height,
        width: u16::try_from(bar_width).unwrap_or(width),
        height: bar_height,
    }
}

/// Renders the loader screens on a [`Display`].
///
/// Until [`LoaderScreen::begin`] succeeds every draw call is skipped, so a
/// missing or broken panel never stops the selection flow.
pub struct LoaderScreen<D> {
    display: D,
    enabled: bool,
}

impl<D: Display> LoaderScreen<D> {
    pub const fn new(display: D) -> Self {
        Self {
            display,
            enabled: false,
        }
    }

    /// Initialize and switch on the display
    pub fn begin(&mut self) -> Result<(), DisplayError> {
        self.enabled = false;
        self.display.begin()?;
        self.display.turn_on();
        self.enabled = true;
        Ok(())
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Current selection with the time left to change it
    pub fn show_selection(
        &mut self,
        selection: Selection,
        remaining: Duration,
        window: Duration,
    ) -> Result<(), DisplayError> {
        if !self.enabled {
            return Ok(());
        }

        let bar = progress_bar(self.display.width(), self.display.height(), remaining, window);

        self.display.start_frame();
        self.draw_header(selection.label());
        self.display
            .draw_text(0, STATUS_Y, TextSize::Small, SELECTION_HINT);
        if bar.width > 0 {
            self.display.fill_rect(bar.x, bar.y, bar.width, bar.height);
        }
        self.display.end_frame()
    }

    pub fn show_boot(&mut self, selection: Selection) -> Result<(), DisplayError> {
        if !self.enabled {
            return Ok(());
        }

        self.display.start_frame();
        self.draw_header(selection.label());
        self.display.draw_text(0, STATUS_Y, TextSize::Small, BOOTING);
        self.display.end_frame()
    }

    pub fn show_error(&mut self, message: &str) -> Result<(), DisplayError> {
        if !self.enabled {
            return Ok(());
        }

        self.display.start_frame();
        self.draw_header(ERROR_HEADING);
        self.display.draw_text(0, STATUS_Y, TextSize::Small, message);
        self.display.end_frame()
    }

    fn draw_header(&mut self, heading: &str) {
        self.display.draw_text(0, TITLE_Y, TextSize::Small, TITLE);
        self.display
            .draw_text(0, HEADING_Y, TextSize::Large, heading);
    }
}
