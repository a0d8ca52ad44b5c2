use embassy_time::{Instant, Timer};
use embedded_hal::i2c::I2c;
#[cfg(feature = "log")]
use esp_println::println;
use mesh_loader_core::{
    CommitSequencer, DecisionWindow, LoaderScreen, WindowTick, ports::SelectionStore,
};

use crate::config;
use crate::infrastructure::EspSystem;
use crate::infrastructure::drivers::{BootButton, Ssd1306Display};
use crate::infrastructure::repositories::{BootManager, SelectionStorage};

/// Owns every loader resource for the single pass from power-on to restart.
pub(crate) struct LoaderController<I2C: I2c> {
    screen: LoaderScreen<Ssd1306Display<I2C>>,
    store: SelectionStorage,
    boot: BootManager,
    system: EspSystem,
    button: BootButton,
}

impl<I2C: I2c> LoaderController<I2C> {
    pub(crate) fn new(
        display: Ssd1306Display<I2C>,
        store: SelectionStorage,
        boot: BootManager,
        system: EspSystem,
        button: BootButton,
    ) -> Self {
        Self {
            screen: LoaderScreen::new(display),
            store,
            boot,
            system,
            button,
        }
    }

    /// Run the decision window, then commit the selection and restart.
    pub(crate) async fn run(mut self) -> ! {
        // Display bring-up counts against the window
        let started = Instant::now();
        if let Err(_err) = self.screen.begin() {
            #[cfg(feature = "log")]
            println!("Display init failed ({:?}), continuing without screen", _err);
        }

        let initial = self.store.load();
        let mut window =
            DecisionWindow::start(initial, started, config::WINDOW, &mut self.screen);

        let selection = loop {
            match window.tick(self.button.sample(), &mut self.screen) {
                WindowTick::Presenting { toggled: true } => {
                    #[cfg(feature = "log")]
                    println!("Selection changed to {}", window.selection().label());
                }
                WindowTick::Presenting { toggled: false } => {}
                WindowTick::Expired(selection) => break selection,
            }
            Timer::after(config::LOOP.poll_interval).await;
        };

        #[cfg(feature = "log")]
        {
            println!("Committing {}", selection.label());
            match self.boot.current_app_partition() {
                Ok(current) => println!("Current boot partition: {:?}", current),
                Err(err) => println!("Current boot partition unknown ({:?})", err),
            }
        }

        CommitSequencer::new(
            &mut self.store,
            &mut self.boot,
            &mut self.system,
            config::COMMIT,
        )
        .commit(selection, &mut self.screen)
    }
}
