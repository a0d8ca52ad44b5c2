#![allow(clippy::unreadable_literal)]

use embassy_time::Duration;
use esp_hal::gpio::Pull;
use mesh_loader_core::{CommitConfig, WindowConfig};

#[cfg(all(feature = "heltec-v2", feature = "tbeam"))]
compile_error!("select at most one board feature");

pub(crate) struct StorageConfig {
    /// Flash offset of the `loader` data partition
    pub partition_offset: u32,
    pub namespace: &'static str,
    pub key: &'static str,
}

pub(crate) struct LoopConfig {
    pub poll_interval: Duration,
}

pub(crate) struct BoardConfig {
    #[cfg_attr(not(feature = "log"), allow(dead_code))]
    pub name: &'static str,
    pub button_pull: Pull,
    /// Whether the power rail is switched on by driving its pin low
    pub rail_active_low: bool,
}

#[cfg_attr(not(feature = "log"), allow(dead_code))]
pub(crate) struct FirmwareConfig {
    pub version: &'static str,
}

pub(crate) const WINDOW: WindowConfig = WindowConfig::DEFAULT;

pub(crate) const COMMIT: CommitConfig = CommitConfig::DEFAULT;

pub(crate) const STORAGE: StorageConfig = StorageConfig {
    partition_offset: 0x10000,
    namespace: "mesh-loader",
    key: "meshcore",
};

pub(crate) const LOOP: LoopConfig = LoopConfig {
    poll_interval: Duration::from_millis(1),
};

#[cfg_attr(not(feature = "log"), allow(dead_code))]
pub(crate) const FIRMWARE: FirmwareConfig = FirmwareConfig {
    version: env!("BUILD_VERSION"),
};

#[cfg(feature = "heltec-v2")]
pub(crate) const BOARD: BoardConfig = BoardConfig {
    name: "Heltec WiFi LoRa 32 V2",
    button_pull: Pull::Up,
    rail_active_low: true,
};
#[cfg(feature = "tbeam")]
pub(crate) const BOARD: BoardConfig = BoardConfig {
    name: "LilyGO T-Beam",
    // GPIO38 is input-only, the board has an external pull-up
    button_pull: Pull::None,
    rail_active_low: false,
};
#[cfg(not(any(feature = "heltec-v2", feature = "tbeam")))]
pub(crate) const BOARD: BoardConfig = BoardConfig {
    name: "ESP32",
    button_pull: Pull::Up,
    rail_active_low: false,
};

#[cfg(feature = "heltec-v2")]
macro_rules! i2c_sda_gpio {
    ($p:expr) => {
        $p.GPIO4
    };
}
#[cfg(not(feature = "heltec-v2"))]
macro_rules! i2c_sda_gpio {
    ($p:expr) => {
        $p.GPIO21
    };
}

#[cfg(feature = "heltec-v2")]
macro_rules! i2c_scl_gpio {
    ($p:expr) => {
        $p.GPIO15
    };
}
#[cfg(not(feature = "heltec-v2"))]
macro_rules! i2c_scl_gpio {
    ($p:expr) => {
        $p.GPIO22
    };
}

#[cfg(feature = "tbeam")]
macro_rules! button_gpio {
    ($p:expr) => {
        $p.GPIO38
    };
}
#[cfg(not(feature = "tbeam"))]
macro_rules! button_gpio {
    ($p:expr) => {
        $p.GPIO0
    };
}

/// Vext rail feeding the OLED, `None` on boards without a switched rail
#[cfg(feature = "heltec-v2")]
macro_rules! vext_gpio {
    ($p:expr) => {
        Some($p.GPIO21)
    };
}
#[cfg(not(feature = "heltec-v2"))]
macro_rules! vext_gpio {
    ($p:expr) => {
        None::<esp_hal::peripherals::GPIO21<'static>>
    };
}

#[cfg(feature = "heltec-v2")]
macro_rules! oled_reset_gpio {
    ($p:expr) => {
        Some($p.GPIO16)
    };
}
#[cfg(not(feature = "heltec-v2"))]
macro_rules! oled_reset_gpio {
    ($p:expr) => {
        None::<esp_hal::peripherals::GPIO16<'static>>
    };
}
