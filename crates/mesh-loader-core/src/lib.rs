#![no_std]

//! Mesh Loader core - boot-time firmware selector
//!
//! Architecture layers:
//! - `entity` - [`Selection`] and the boot slot it maps to
//! - `ports` - Capability traits implemented by the platform
//! - `debounce` - Button contact-bounce filter
//! - `countdown` - Decision window clock
//! - `window` - Decision window state machine and its owning context
//! - `screen` - The three loader screens on top of [`ports::Display`]
//! - `storage` - Magic-header record storage and the persisted selection
//! - `commit` - Boot partition switch with restart-as-retry policy
//!
//! Nothing in here touches hardware directly, so the whole selection flow
//! runs against in-memory fakes on the host.

pub mod commit;
pub mod countdown;
pub mod debounce;
pub mod entity;
pub mod ports;
pub mod screen;
pub mod storage;
pub mod window;

// Entity exports
pub use entity::{BootSlot, Selection};

// Input exports
pub use debounce::{Debouncer, InputEvent, InputSample};

// Window exports
pub use countdown::Countdown;
pub use window::{ControllerState, DecisionWindow, Phase, Step, WindowConfig, WindowTick};

// Commit exports
pub use commit::{CommitConfig, CommitOutcome, CommitSequencer};

// Screen exports
pub use screen::LoaderScreen;

// Storage exports
pub use storage::{FlashSelectionStore, NorFlashStorageDriver, PersistentStorage};
