use esp_bootloader_esp_idf::{
    ota::Ota,
    partitions::{
        AppPartitionSubType,
        DataPartitionSubType,
        PARTITION_TABLE_MAX_LEN,
        PartitionType,
        read_partition_table,
    },
};
use esp_storage::FlashStorage;
use mesh_loader_core::{
    BootSlot,
    ports::{BootPartitionControl, FirmwareError},
};

use crate::infrastructure::drivers::FlashStorageMutex;

/// Number of OTA application slots in `partitions.csv`
const OTA_SLOTS: usize = 2;

const fn app_subtype(slot: BootSlot) -> AppPartitionSubType {
    match slot {
        BootSlot::Ota0 => AppPartitionSubType::Ota0,
        BootSlot::Ota1 => AppPartitionSubType::Ota1,
    }
}

/// Boot target control through the bootloader's `otadata` partition.
pub(crate) struct BootManager {
    flash: &'static FlashStorageMutex,
}

impl BootManager {
    pub(crate) fn new(flash: &'static FlashStorageMutex) -> Self {
        Self { flash }
    }

    /// Application partition the bootloader will start next
    #[cfg_attr(not(feature = "log"), allow(dead_code))]
    pub(crate) fn current_app_partition(&self) -> Result<AppPartitionSubType, FirmwareError> {
        self.with_ota(|ota| {
            ota.current_app_partition()
                .map_err(|_| FirmwareError::PartitionTable)
        })
    }

    fn with_ota<R>(
        &self,
        f: impl FnOnce(&mut Ota<'_, FlashStorage<'static>>) -> Result<R, FirmwareError>,
    ) -> Result<R, FirmwareError> {
        self.flash.lock(|cell| {
            let mut flash = cell.borrow_mut();
            let mut buffer = [0u8; PARTITION_TABLE_MAX_LEN];
            let table = read_partition_table(&mut *flash, &mut buffer)
                .map_err(|_| FirmwareError::PartitionTable)?;
            let ota_part = table
                .find_partition(PartitionType::Data(DataPartitionSubType::Ota))
                .map_err(|_| FirmwareError::PartitionTable)?
                .ok_or(FirmwareError::PartitionTable)?;
            let mut ota_part = ota_part.as_embedded_storage(&mut *flash);
            let mut ota =
                Ota::new(&mut ota_part, OTA_SLOTS).map_err(|_| FirmwareError::PartitionTable)?;
            f(&mut ota)
        })
    }
}

impl BootPartitionControl for BootManager {
    type Partition = AppPartitionSubType;

    fn find_app_partition(&mut self, slot: BootSlot) -> Result<Self::Partition, FirmwareError> {
        let sub_type = app_subtype(slot);
        self.flash.lock(|cell| {
            let mut flash = cell.borrow_mut();
            let mut buffer = [0u8; PARTITION_TABLE_MAX_LEN];
            let table = read_partition_table(&mut *flash, &mut buffer)
                .map_err(|_| FirmwareError::PartitionTable)?;
            match table.find_partition(PartitionType::App(sub_type)) {
                Ok(Some(_)) => Ok(sub_type),
                Ok(None) => Err(FirmwareError::PartitionNotFound),
                Err(_) => Err(FirmwareError::PartitionTable),
            }
        })
    }

    fn set_boot_partition(&mut self, partition: &Self::Partition) -> Result<(), FirmwareError> {
        self.with_ota(|ota| {
            ota.set_current_app_partition(*partition)
                .map_err(|_| FirmwareError::SetBootPartition)
        })
    }
}
