use embassy_time::Duration;
use esp_hal::delay::Delay;
#[cfg(feature = "log")]
use esp_println::println;
use mesh_loader_core::{CommitOutcome, ports::SystemControl};

/// Blocking delay and chip reset.
pub(crate) struct EspSystem {
    delay: Delay,
}

impl EspSystem {
    pub(crate) fn new() -> Self {
        Self {
            delay: Delay::new(),
        }
    }
}

impl SystemControl for EspSystem {
    fn delay(&mut self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        self.delay.delay_millis(millis);
    }

    fn restart(&mut self, outcome: CommitOutcome) -> ! {
        #[cfg(feature = "log")]
        match outcome {
            CommitOutcome::Booting(slot) => println!("Restarting into ota_{}", slot.index()),
            CommitOutcome::LookupFailed(err) => {
                println!("Partition lookup failed ({:?}), restarting", err);
            }
            CommitOutcome::SetFailed(err) => {
                println!("Boot partition change failed ({:?}), restarting", err);
            }
        }
        #[cfg(not(feature = "log"))]
        let _ = outcome;

        esp_hal::system::software_reset()
    }
}
