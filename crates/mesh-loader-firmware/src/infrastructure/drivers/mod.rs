mod boot_button;
mod flash_storage;
mod power_rail;
mod ssd1306_display;

pub(crate) use boot_button::BootButton;
pub(crate) use flash_storage::{FlashStorageMutex, SharedFlash, init_flash_storage_mutex};
pub(crate) use power_rail::{PowerRail, init_power_rail};
pub(crate) use ssd1306_display::Ssd1306Display;
