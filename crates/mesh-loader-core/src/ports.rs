use embassy_time::Duration;

use crate::{commit::CommitOutcome, entity::BootSlot, entity::Selection};

/// Error type for the display operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Controller did not respond to initialization
    Init,
    /// Frame transfer failed
    Bus,
}

/// Error type for the persistence operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceError {
    DriverError,
    /// Stored record is missing or belongs to another namespace
    InvalidRecord,
}

/// Error type for the boot partition operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareError {
    /// Partition table could not be read or parsed
    PartitionTable,
    /// Requested slot is absent from the partition table
    PartitionNotFound,
    /// Platform rejected the boot target change
    SetBootPartition,
}

/// Text scale supported by the loader screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Large,
}

/// Drawing capabilities the loader needs from a display controller.
///
/// Coordinates are in pixels with the origin at the top-left corner. Drawing
/// primitives only touch the frame started by [`Display::start_frame`]; the
/// frame becomes visible on [`Display::end_frame`].
pub trait Display {
    /// Initialize the controller
    fn begin(&mut self) -> Result<(), DisplayError>;

    /// Switch the panel on after a successful [`Display::begin`]
    fn turn_on(&mut self) {}

    /// Start a new frame
    fn start_frame(&mut self);

    /// Push the frame to the panel
    fn end_frame(&mut self) -> Result<(), DisplayError>;

    fn draw_text(&mut self, x: u16, y: u16, size: TextSize, text: &str);

    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16);

    fn width(&self) -> u16;

    fn height(&self) -> u16;
}

/// Durable storage of the selected variant
pub trait SelectionStore {
    /// Read the stored selection, falling back to the default one
    fn load(&mut self) -> Selection;

    /// Persist the selection
    fn save(&mut self, selection: Selection) -> Result<(), PersistenceError>;
}

/// Access to the bootloader's application slots
pub trait BootPartitionControl {
    /// Platform handle of a resolved application partition
    type Partition;

    /// Resolve the application partition of the slot
    fn find_app_partition(&mut self, slot: BootSlot) -> Result<Self::Partition, FirmwareError>;

    /// Mark the partition as the next boot target
    fn set_boot_partition(&mut self, partition: &Self::Partition) -> Result<(), FirmwareError>;
}

/// Process-level control of the device
pub trait SystemControl {
    /// Block everything for the given duration
    fn delay(&mut self, duration: Duration);

    /// Restart the device. The outcome names the path that led here.
    fn restart(&mut self, outcome: CommitOutcome) -> !;
}
