#![no_std]
#![no_main]

#[macro_use]
mod config;
mod controllers;
mod infrastructure;

use embassy_executor::Spawner;
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::{Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, I2c},
    time::Rate,
    timer::timg::TimerGroup,
};
#[cfg(feature = "log")]
use esp_println::println;

use crate::config::BOARD;
use crate::controllers::LoaderController;
use crate::infrastructure::EspSystem;
use crate::infrastructure::drivers::{
    BootButton, PowerRail, Ssd1306Display, init_flash_storage_mutex, init_power_rail,
};
use crate::infrastructure::repositories::{BootManager, SelectionStorage};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    #[cfg(feature = "log")]
    println!(
        "Mesh Loader {} on {}",
        crate::config::FIRMWARE.version,
        BOARD.name
    );

    // Flash is shared between the selection record and the partition table
    let flash = init_flash_storage_mutex(peripherals.FLASH);
    let store = SelectionStorage::new(flash);
    let boot = BootManager::new(flash);

    // Display and its board wiring
    let rail = vext_gpio!(peripherals)
        .map(|pin| init_power_rail(PowerRail::new(pin, BOARD.rail_active_low)));
    let reset = oled_reset_gpio!(peripherals)
        .map(|pin| Output::new(pin, Level::High, OutputConfig::default()));
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .expect("failed to init I2C0")
    .with_sda(i2c_sda_gpio!(peripherals))
    .with_scl(i2c_scl_gpio!(peripherals));
    let display = Ssd1306Display::new(i2c, reset, rail);

    let button = BootButton::new(button_gpio!(peripherals), BOARD.button_pull);

    LoaderController::new(display, store, boot, EspSystem::new(), button)
        .run()
        .await
}
