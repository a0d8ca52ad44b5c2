#[cfg(feature = "log")]
use esp_println::println;
use mesh_loader_core::{
    FlashSelectionStore,
    NorFlashStorageDriver,
    Selection,
    ports::{PersistenceError, SelectionStore},
};

use crate::config;
use crate::infrastructure::drivers::{FlashStorageMutex, SharedFlash};

type SelectionFlashStore = FlashSelectionStore<NorFlashStorageDriver<SharedFlash>>;

/// Selection record in the `loader` data partition.
pub(crate) struct SelectionStorage {
    store: SelectionFlashStore,
}

impl SelectionStorage {
    pub(crate) fn new(flash: &'static FlashStorageMutex) -> Self {
        let driver =
            NorFlashStorageDriver::new(SharedFlash::new(flash), config::STORAGE.partition_offset);
        Self {
            store: FlashSelectionStore::new(driver, config::STORAGE.namespace, config::STORAGE.key),
        }
    }
}

impl SelectionStore for SelectionStorage {
    fn load(&mut self) -> Selection {
        match self.store.read() {
            Ok(selection) => {
                #[cfg(feature = "log")]
                println!("Loaded selection: {}", selection.label());
                selection
            }
            Err(_err) => {
                #[cfg(feature = "log")]
                println!("No stored selection ({:?}), using default", _err);
                Selection::default()
            }
        }
    }

    fn save(&mut self, selection: Selection) -> Result<(), PersistenceError> {
        let result = self.store.save(selection);
        #[cfg(feature = "log")]
        if let Err(err) = result {
            println!("Failed to persist selection: {:?}", err);
        }
        result
    }
}
