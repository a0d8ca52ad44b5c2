//! Switched peripheral power rail.
//!
//! Some boards feed the OLED from a rail behind a GPIO-controlled switch
//! (Heltec's Vext). Every user claims the rail before use and releases it
//! afterwards; the rail stays on while at least one claim is held.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use esp_hal::gpio::{Level, Output, OutputConfig, OutputPin};
use static_cell::StaticCell;

pub(crate) type PowerRailMutex = Mutex<CriticalSectionRawMutex, RefCell<PowerRail>>;

static POWER_RAIL_CELL: StaticCell<PowerRailMutex> = StaticCell::new();

pub(crate) fn init_power_rail(rail: PowerRail) -> &'static PowerRailMutex {
    POWER_RAIL_CELL.init(Mutex::new(RefCell::new(rail)))
}

pub(crate) struct PowerRail {
    pin: Output<'static>,
    active_low: bool,
    users: u8,
}

impl PowerRail {
    /// Take the rail pin, starting switched off
    pub(crate) fn new(pin: impl OutputPin + 'static, active_low: bool) -> Self {
        let off = if active_low { Level::High } else { Level::Low };
        Self {
            pin: Output::new(pin, off, OutputConfig::default()),
            active_low,
            users: 0,
        }
    }

    pub(crate) fn claim(&mut self) {
        if self.users == 0 {
            self.switch(true);
        }
        self.users = self.users.saturating_add(1);
    }

    pub(crate) fn release(&mut self) {
        match self.users {
            0 => {}
            1 => {
                self.users = 0;
                self.switch(false);
            }
            _ => self.users -= 1,
        }
    }

    fn switch(&mut self, on: bool) {
        let level = if on == self.active_low {
            Level::Low
        } else {
            Level::High
        };
        self.pin.set_level(level);
    }
}
