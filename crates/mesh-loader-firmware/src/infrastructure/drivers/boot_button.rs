use embassy_time::Instant;
use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};
use mesh_loader_core::InputSample;

/// Polled boot button.
///
/// The decision window samples the raw level once per loop iteration, so no
/// interrupt is bound to the pin.
pub(crate) struct BootButton {
    input: Input<'static>,
}

impl BootButton {
    pub(crate) fn new(pin: impl InputPin + 'static, pull: Pull) -> Self {
        let config = InputConfig::default().with_pull(pull);
        Self {
            input: Input::new(pin, config),
        }
    }

    /// Current raw level with its timestamp
    pub(crate) fn sample(&self) -> InputSample {
        InputSample::new(self.input.is_high(), Instant::now())
    }
}
