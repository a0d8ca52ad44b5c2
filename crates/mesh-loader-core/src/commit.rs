//! Boot partition commit.
//!
//! Every path through the sequencer ends in a restart. A failed lookup or
//! boot target change is shown on screen for [`CommitConfig::error_hold`]
//! before restarting; the selection was persisted first, so the next boot
//! retries the same choice after a fresh decision window.

use embassy_time::Duration;

use crate::entity::{BootSlot, Selection};
use crate::ports::{
    BootPartitionControl, Display, FirmwareError, PersistenceError, SelectionStore, SystemControl,
};
use crate::screen::LoaderScreen;

pub const FIND_PART_FAILED: &str = "find part failed";
pub const SET_PART_FAILED: &str = "set part failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitConfig {
    /// How long an error screen stays up before restarting
    pub error_hold: Duration,
}

impl CommitConfig {
    pub const DEFAULT: Self = Self {
        error_hold: Duration::from_millis(5000),
    };
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Path the sequencer took before restarting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Boot target switched, restarting into the slot
    Booting(BootSlot),
    LookupFailed(FirmwareError),
    SetFailed(FirmwareError),
}

impl CommitOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, CommitOutcome::Booting(_))
    }
}

pub struct CommitSequencer<'a, S, B, Y> {
    store: &'a mut S,
    boot: &'a mut B,
    system: &'a mut Y,
    config: CommitConfig,
}

impl<'a, S, B, Y> CommitSequencer<'a, S, B, Y>
where
    S: SelectionStore,
    B: BootPartitionControl,
    Y: SystemControl,
{
    pub fn new(store: &'a mut S, boot: &'a mut B, system: &'a mut Y, config: CommitConfig) -> Self {
        Self {
            store,
            boot,
            system,
            config,
        }
    }

    /// Persist the selection, switch the boot target and restart.
    pub fn commit<D: Display>(mut self, selection: Selection, screen: &mut LoaderScreen<D>) -> ! {
        let (outcome, _) = self.run(selection, screen);
        self.system.restart(outcome)
    }

    /// Everything [`CommitSequencer::commit`] does except the restart.
    ///
    /// Returns the outcome together with the result of the selection write.
    /// A failed write does not stop the commit.
    pub fn run<D: Display>(
        &mut self,
        selection: Selection,
        screen: &mut LoaderScreen<D>,
    ) -> (CommitOutcome, Result<(), PersistenceError>) {
        let persisted = self.store.save(selection);
        let outcome = self.switch_boot_target(selection, screen);
        (outcome, persisted)
    }

    fn switch_boot_target<D: Display>(
        &mut self,
        selection: Selection,
        screen: &mut LoaderScreen<D>,
    ) -> CommitOutcome {
        let slot = selection.boot_slot();

        let partition = match self.boot.find_app_partition(slot) {
            Ok(partition) => partition,
            Err(err) => {
                self.hold_error(screen, FIND_PART_FAILED);
                return CommitOutcome::LookupFailed(err);
            }
        };

        if let Err(err) = self.boot.set_boot_partition(&partition) {
            self.hold_error(screen, SET_PART_FAILED);
            return CommitOutcome::SetFailed(err);
        }

        let _ = screen.show_boot(selection);
        CommitOutcome::Booting(slot)
    }

    fn hold_error<D: Display>(&mut self, screen: &mut LoaderScreen<D>, message: &str) {
        let _ = screen.show_error(message);
        self.system.delay(self.config.error_hold);
    }
}
