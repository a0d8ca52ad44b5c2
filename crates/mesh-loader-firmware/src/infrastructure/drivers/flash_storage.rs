//! Flash storage driver with shared mutex access
//!
//! The selection record and the partition table both live in the ESP32's
//! internal flash. Both go through the same mutex so the boot manager and the
//! selection storage never touch the chip at the same time.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embedded_storage::nor_flash::{ErrorType, NorFlash, ReadNorFlash};
use esp_hal::peripherals::FLASH;
use esp_storage::FlashStorage;
use static_cell::StaticCell;

/// Type alias for the shared flash storage mutex
pub(crate) type FlashStorageMutex = Mutex<CriticalSectionRawMutex, RefCell<FlashStorage<'static>>>;

static FLASH_STORAGE_CELL: StaticCell<FlashStorageMutex> = StaticCell::new();

/// Initialize the shared flash storage mutex from the FLASH peripheral.
///
/// # Panics
/// Panics if called more than once.
pub(crate) fn init_flash_storage_mutex(flash: FLASH<'static>) -> &'static FlashStorageMutex {
    let flash_storage = FlashStorage::new(flash);
    FLASH_STORAGE_CELL.init(Mutex::new(RefCell::new(flash_storage)))
}

/// NOR flash handle that locks the shared mutex for every operation.
#[derive(Clone, Copy)]
pub(crate) struct SharedFlash {
    storage: &'static FlashStorageMutex,
}

impl SharedFlash {
    pub(crate) fn new(storage: &'static FlashStorageMutex) -> Self {
        Self { storage }
    }
}

impl ErrorType for SharedFlash {
    type Error = <FlashStorage<'static> as ErrorType>::Error;
}

impl ReadNorFlash for SharedFlash {
    const READ_SIZE: usize = <FlashStorage<'static> as ReadNorFlash>::READ_SIZE;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.storage
            .lock(|cell| ReadNorFlash::read(&mut *cell.borrow_mut(), offset, bytes))
    }

    fn capacity(&self) -> usize {
        self.storage
            .lock(|cell| ReadNorFlash::capacity(&*cell.borrow()))
    }
}

impl NorFlash for SharedFlash {
    const WRITE_SIZE: usize = <FlashStorage<'static> as NorFlash>::WRITE_SIZE;
    const ERASE_SIZE: usize = <FlashStorage<'static> as NorFlash>::ERASE_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        self.storage.lock(|cell| {
            let result = NorFlash::erase(&mut *cell.borrow_mut(), from, to);
            #[cfg(feature = "log")]
            if result.is_err() {
                esp_println::println!("Failed to erase flash storage: {:?}", result);
            }
            result
        })
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.storage.lock(|cell| {
            let result = NorFlash::write(&mut *cell.borrow_mut(), offset, bytes);
            #[cfg(feature = "log")]
            if result.is_err() {
                esp_println::println!("Failed to write to flash storage: {:?}", result);
            }
            result
        })
    }
}
