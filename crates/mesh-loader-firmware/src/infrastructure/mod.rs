//! Infrastructure layer - Port implementations
//!
//! Concrete implementations of the loader ports on top of the ESP32
//! peripherals: flash, I2C OLED, GPIO and the bootloader's OTA data.

pub(crate) mod drivers;
pub(crate) mod repositories;
mod system;

pub(crate) use system::EspSystem;
