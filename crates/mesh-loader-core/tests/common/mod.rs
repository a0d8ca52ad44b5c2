//! In-memory fakes for the loader ports.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embassy_time::{Duration, Instant};
use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash, check_erase, check_read, check_write,
};
use mesh_loader_core::commit::CommitOutcome;
use mesh_loader_core::entity::{BootSlot, Selection};
use mesh_loader_core::ports::{
    BootPartitionControl, Display, DisplayError, FirmwareError, PersistenceError, SelectionStore,
    SystemControl, TextSize,
};
use mesh_loader_core::InputSample;

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

pub fn released(ms: u64) -> InputSample {
    InputSample::new(true, at(ms))
}

pub fn pressed(ms: u64) -> InputSample {
    InputSample::new(false, at(ms))
}

// -----------------------------------------------------------------------------
// Flash
// -----------------------------------------------------------------------------

pub const SECTOR_SIZE: usize = 4096;
pub const FLASH_SIZE: usize = 4 * SECTOR_SIZE;

/// RAM backed NOR flash, shared so a "rebooted" store can see the same bytes.
#[derive(Clone)]
pub struct RamFlash {
    data: Rc<RefCell<Vec<u8>>>,
    fail_erases: Rc<RefCell<bool>>,
    fail_writes: Rc<RefCell<bool>>,
    erases: Rc<RefCell<u32>>,
}

impl RamFlash {
    pub fn erased() -> Self {
        Self {
            data: Rc::new(RefCell::new(vec![0xFF; FLASH_SIZE])),
            fail_erases: Rc::new(RefCell::new(false)),
            fail_writes: Rc::new(RefCell::new(false)),
            erases: Rc::new(RefCell::new(0)),
        }
    }

    /// Fail every erase, leaving the sector untouched
    pub fn set_fail_erases(&self, fail: bool) {
        *self.fail_erases.borrow_mut() = fail;
    }

    /// Fail every write after its erase has already gone through
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.borrow_mut() = fail;
    }

    /// Sector erases performed so far
    pub fn erases(&self) -> u32 {
        *self.erases.borrow()
    }

    pub fn bytes(&self, offset: usize, len: usize) -> Vec<u8> {
        self.data.borrow()[offset..offset + len].to_vec()
    }

    pub fn poke(&self, offset: usize, bytes: &[u8]) {
        self.data.borrow_mut()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

impl ErrorType for RamFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 4;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(self, offset, bytes.len())?;
        let start = offset as usize;
        bytes.copy_from_slice(&self.data.borrow()[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        FLASH_SIZE
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = 4096;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(self, from, to)?;
        if *self.fail_erases.borrow() {
            return Err(NorFlashErrorKind::Other);
        }
        *self.erases.borrow_mut() += (to - from) / Self::ERASE_SIZE as u32;
        self.data.borrow_mut()[from as usize..to as usize].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(self, offset, bytes.len())?;
        if *self.fail_writes.borrow() {
            return Err(NorFlashErrorKind::Other);
        }
        let start = offset as usize;
        let mut data = self.data.borrow_mut();
        for (cell, byte) in data[start..start + bytes.len()].iter_mut().zip(bytes) {
            // NOR flash can only clear bits
            *cell &= *byte;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Display
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    TurnOn,
    StartFrame,
    EndFrame,
    Text {
        x: u16,
        y: u16,
        size: TextSize,
        text: String,
    },
    Rect {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },
}

/// Display that records every call
pub struct RecordingDisplay {
    pub ops: Vec<DrawOp>,
    pub fail_begin: bool,
    width: u16,
    height: u16,
}

impl RecordingDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            ops: Vec::new(),
            fail_begin: false,
            width,
            height,
        }
    }

    pub fn broken() -> Self {
        Self {
            fail_begin: true,
            ..Self::new(128, 64)
        }
    }

    pub fn frames(&self) -> usize {
        self.ops.iter().filter(|op| **op == DrawOp::EndFrame).count()
    }

    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Texts of the last complete frame
    pub fn last_frame_texts(&self) -> Vec<String> {
        let start = self
            .ops
            .iter()
            .rposition(|op| *op == DrawOp::StartFrame)
            .unwrap_or(0);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(u16, u16, u16, u16)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect()
    }
}

impl Display for RecordingDisplay {
    fn begin(&mut self) -> Result<(), DisplayError> {
        if self.fail_begin {
            return Err(DisplayError::Init);
        }
        Ok(())
    }

    fn turn_on(&mut self) {
        self.ops.push(DrawOp::TurnOn);
    }

    fn start_frame(&mut self) {
        self.ops.push(DrawOp::StartFrame);
    }

    fn end_frame(&mut self) -> Result<(), DisplayError> {
        self.ops.push(DrawOp::EndFrame);
        Ok(())
    }

    fn draw_text(&mut self, x: u16, y: u16, size: TextSize, text: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            text: text.to_owned(),
        });
    }

    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }
}

// -----------------------------------------------------------------------------
// Selection store
// -----------------------------------------------------------------------------

/// Selection store backed by a shared cell that survives simulated restarts
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub stored: Rc<RefCell<Option<Selection>>>,
    pub writes: Rc<RefCell<u32>>,
    pub fail_writes: bool,
}

impl SelectionStore for MemoryStore {
    fn load(&mut self) -> Selection {
        self.stored.borrow().unwrap_or_default()
    }

    fn save(&mut self, selection: Selection) -> Result<(), PersistenceError> {
        *self.writes.borrow_mut() += 1;
        if self.fail_writes {
            return Err(PersistenceError::DriverError);
        }
        *self.stored.borrow_mut() = Some(selection);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Boot partitions
// -----------------------------------------------------------------------------

/// Partition table with configurable slots
pub struct FakeBoot {
    pub present: Vec<BootSlot>,
    pub reject_set: bool,
    pub lookups: Vec<BootSlot>,
    pub active: Option<BootSlot>,
}

impl FakeBoot {
    pub fn with_both_slots() -> Self {
        Self {
            present: vec![BootSlot::Ota0, BootSlot::Ota1],
            reject_set: false,
            lookups: Vec::new(),
            active: None,
        }
    }
}

impl BootPartitionControl for FakeBoot {
    type Partition = BootSlot;

    fn find_app_partition(&mut self, slot: BootSlot) -> Result<BootSlot, FirmwareError> {
        self.lookups.push(slot);
        if self.present.contains(&slot) {
            Ok(slot)
        } else {
            Err(FirmwareError::PartitionNotFound)
        }
    }

    fn set_boot_partition(&mut self, partition: &BootSlot) -> Result<(), FirmwareError> {
        if self.reject_set {
            return Err(FirmwareError::SetBootPartition);
        }
        self.active = Some(*partition);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// System
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSystem {
    pub delays: Vec<Duration>,
}

impl SystemControl for FakeSystem {
    fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
    }

    fn restart(&mut self, outcome: CommitOutcome) -> ! {
        panic!("restart: {:?}", outcome)
    }
}
