use bytemuck::{Pod, Zeroable};
use embedded_storage::nor_flash::NorFlash;

use crate::entity::Selection;
use crate::ports::{PersistenceError, SelectionStore};

const MAGIC_HEADER: u16 = 0xB007;
pub const MAGIC_HEADER_SIZE: usize = MAGIC_HEADER.to_le_bytes().len();

/// Magic followed by the little-endian write sequence
pub const HEADER_SIZE: usize = MAGIC_HEADER_SIZE + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    DriverError,
    InvalidMagicHeader,
    InvalidData,
}

pub trait Encodable<const SIZE: usize>
where
    Self: Sized,
{
    fn encode(self) -> [u8; SIZE];
    fn decode(data: &[u8]) -> Option<Self>;
}

/// Storage split into independently erasable banks.
///
/// Writing one bank must leave every other bank intact.
pub trait StorageDriver<const STORAGE_SIZE: usize> {
    const BANKS: usize;

    fn read(&mut self, bank: usize, buffer: &mut [u8]) -> Result<(), StorageError>;
    fn write(&mut self, bank: usize, buffer: &[u8]) -> Result<(), StorageError>;
}

/// Valid copy found in one bank
struct StoredCopy<T> {
    bank: usize,
    sequence: u16,
    value: T,
}

/// Persistent storage implementation using a storage driver.
///
/// Each save goes to the bank after the one holding the newest valid copy,
/// so an interrupted or failed save leaves the previous copy readable. A
/// save of the value already stored touches no bank.
pub struct PersistentStorage<DRIVER: StorageDriver<STORAGE_SIZE>, const STORAGE_SIZE: usize> {
    driver: DRIVER,
}

impl<DRIVER: StorageDriver<STORAGE_SIZE>, const STORAGE_SIZE: usize>
    PersistentStorage<DRIVER, STORAGE_SIZE>
{
    pub fn new(driver: DRIVER) -> Self {
        Self { driver }
    }

    /// Load persistent data from flash
    pub fn load<const SIZE: usize, T: Encodable<SIZE>>(&mut self) -> Result<T, StorageError> {
        self.newest::<SIZE, T>().map(|copy| copy.value)
    }

    /// Save persistent data to flash
    pub fn save<const SIZE: usize, T: Encodable<SIZE> + Clone>(
        &mut self,
        state: &T,
    ) -> Result<(), StorageError> {
        let encoded = state.clone().encode();

        let (bank, sequence) = match self.newest::<SIZE, T>() {
            Ok(current) => {
                if current.value.encode() == encoded {
                    return Ok(());
                }
                (
                    (current.bank + 1) % DRIVER::BANKS,
                    current.sequence.wrapping_add(1),
                )
            }
            Err(StorageError::DriverError) => return Err(StorageError::DriverError),
            Err(_) => (0, 0),
        };

        let mut data = [0xFFu8; STORAGE_SIZE];
        data[0..MAGIC_HEADER_SIZE].copy_from_slice(&MAGIC_HEADER.to_le_bytes());
        data[MAGIC_HEADER_SIZE..HEADER_SIZE].copy_from_slice(&sequence.to_le_bytes());
        data[HEADER_SIZE..HEADER_SIZE + SIZE].copy_from_slice(&encoded);

        self.driver.write(bank, &data)
    }

    /// Newest bank holding a decodable copy.
    ///
    /// With no valid copy, a driver error wins over a bad record, and a bad
    /// record wins over an erased bank.
    fn newest<const SIZE: usize, T: Encodable<SIZE>>(
        &mut self,
    ) -> Result<StoredCopy<T>, StorageError> {
        let mut newest: Option<StoredCopy<T>> = None;
        let mut error = StorageError::InvalidMagicHeader;

        for bank in 0..DRIVER::BANKS {
            match self.read_bank::<SIZE, T>(bank) {
                Ok(copy) => match &newest {
                    Some(best) if !is_newer(copy.sequence, best.sequence) => {}
                    _ => newest = Some(copy),
                },
                Err(StorageError::DriverError) => error = StorageError::DriverError,
                Err(StorageError::InvalidData) if error != StorageError::DriverError => {
                    error = StorageError::InvalidData;
                }
                Err(_) => {}
            }
        }

        newest.ok_or(error)
    }

    fn read_bank<const SIZE: usize, T: Encodable<SIZE>>(
        &mut self,
        bank: usize,
    ) -> Result<StoredCopy<T>, StorageError> {
        let mut buffer = [0u8; STORAGE_SIZE];

        self.driver.read(bank, &mut buffer)?;

        let magic = u16::from_le_bytes([buffer[0], buffer[1]]);
        if magic != MAGIC_HEADER {
            return Err(StorageError::InvalidMagicHeader);
        }
        let sequence = u16::from_le_bytes([buffer[MAGIC_HEADER_SIZE], buffer[MAGIC_HEADER_SIZE + 1]]);
        let value =
            T::decode(&buffer[HEADER_SIZE..HEADER_SIZE + SIZE]).ok_or(StorageError::InvalidData)?;

        Ok(StoredCopy {
            bank,
            sequence,
            value,
        })
    }
}

/// Sequence comparison that survives wrap-around
fn is_newer(candidate: u16, current: u16) -> bool {
    let diff = candidate.wrapping_sub(current);
    diff != 0 && diff < 0x8000
}

/// Storage driver over two adjacent NOR flash sectors starting at `addr`.
///
/// Bank `n` is the sector at `addr + n * ERASE_SIZE`. A write erases only
/// the sector of its bank, so `addr` must be aligned to the flash erase size
/// and neither sector may be shared.
pub struct NorFlashStorageDriver<F> {
    flash: F,
    addr: u32,
}

impl<F: NorFlash> NorFlashStorageDriver<F> {
    pub fn new(flash: F, addr: u32) -> Self {
        Self { flash, addr }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn bank_addr(&self, bank: usize) -> u32 {
        self.addr + (bank * F::ERASE_SIZE) as u32
    }
}

impl<F: NorFlash, const SIZE: usize> StorageDriver<SIZE> for NorFlashStorageDriver<F> {
    const BANKS: usize = 2;

    fn read(&mut self, bank: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        self.flash
            .read(self.bank_addr(bank), buffer)
            .map_err(|_| StorageError::DriverError)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write(&mut self, bank: usize, buffer: &[u8]) -> Result<(), StorageError> {
        let addr = self.bank_addr(bank);
        self.flash
            .erase(addr, addr + F::ERASE_SIZE as u32)
            .map_err(|_| StorageError::DriverError)?;
        self.flash
            .write(addr, buffer)
            .map_err(|_| StorageError::DriverError)
    }
}

const NAMESPACE_SIZE: usize = 16;
const KEY_SIZE: usize = 12;
pub const SELECTION_RECORD_SIZE: usize = NAMESPACE_SIZE + KEY_SIZE + 2;

/// Bytes the selection record occupies in one bank, header included and
/// padded to the flash word
pub const SELECTION_STORAGE_SIZE: usize = (HEADER_SIZE + SELECTION_RECORD_SIZE).next_multiple_of(4);

/// One boolean flag stored under a private namespace and key.
#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct SelectionRecord {
    namespace: [u8; NAMESPACE_SIZE],
    key: [u8; KEY_SIZE],
    flag: u8,
    _reserved: u8,
}

impl Encodable<SELECTION_RECORD_SIZE> for SelectionRecord {
    fn encode(self) -> [u8; SELECTION_RECORD_SIZE] {
        let mut data = [0u8; SELECTION_RECORD_SIZE];
        data.copy_from_slice(bytemuck::bytes_of(&self));
        data
    }

    fn decode(data: &[u8]) -> Option<Self> {
        let record: SelectionRecord = bytemuck::try_pod_read_unaligned(data).ok()?;
        match record.flag {
            0 | 1 => Some(record),
            _ => None,
        }
    }
}

/// [`SelectionStore`] keeping the selection as a namespaced boolean flag.
///
/// A record written under another namespace or key reads as missing, and a
/// missing record loads as the default [`Selection::Meshcore`].
pub struct FlashSelectionStore<DRIVER: StorageDriver<SELECTION_STORAGE_SIZE>> {
    storage: PersistentStorage<DRIVER, SELECTION_STORAGE_SIZE>,
    namespace: [u8; NAMESPACE_SIZE],
    key: [u8; KEY_SIZE],
}

impl<DRIVER: StorageDriver<SELECTION_STORAGE_SIZE>> FlashSelectionStore<DRIVER> {
    /// Names longer than the record fields are truncated.
    pub fn new(driver: DRIVER, namespace: &str, key: &str) -> Self {
        Self {
            storage: PersistentStorage::new(driver),
            namespace: str_to_array(namespace),
            key: str_to_array(key),
        }
    }

    /// Read the stored selection without falling back to the default
    pub fn read(&mut self) -> Result<Selection, PersistenceError> {
        let record = self
            .storage
            .load::<SELECTION_RECORD_SIZE, SelectionRecord>()
            .map_err(|err| match err {
                StorageError::DriverError => PersistenceError::DriverError,
                StorageError::InvalidMagicHeader | StorageError::InvalidData => {
                    PersistenceError::InvalidRecord
                }
            })?;

        if record.namespace != self.namespace || record.key != self.key {
            return Err(PersistenceError::InvalidRecord);
        }
        Ok(Selection::from_flag(record.flag == 1))
    }
}

impl<DRIVER: StorageDriver<SELECTION_STORAGE_SIZE>> SelectionStore for FlashSelectionStore<DRIVER> {
    fn load(&mut self) -> Selection {
        self.read().unwrap_or_default()
    }

    fn save(&mut self, selection: Selection) -> Result<(), PersistenceError> {
        let record = SelectionRecord {
            namespace: self.namespace,
            key: self.key,
            flag: u8::from(selection.as_flag()),
            _reserved: 0,
        };
        self.storage
            .save::<SELECTION_RECORD_SIZE, SelectionRecord>(&record)
            .map_err(|_| PersistenceError::DriverError)
    }
}

/// Copy a string into a fixed-size byte array, padding with zeros
fn str_to_array<const N: usize>(s: &str) -> [u8; N] {
    let mut arr = [0u8; N];
    let bytes = s.as_bytes();
    let len = bytes.len().min(N);
    arr[..len].copy_from_slice(&bytes[..len]);
    arr
}
