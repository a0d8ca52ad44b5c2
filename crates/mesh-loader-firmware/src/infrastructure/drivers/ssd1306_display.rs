//! SSD1306 OLED over I2C.

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use embedded_hal::i2c::I2c;
use esp_hal::{delay::Delay, gpio::Output};
use mesh_loader_core::ports::{Display, DisplayError, TextSize};
use ssd1306::{I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*};

use super::power_rail::PowerRailMutex;

/// Time the panel needs after the rail comes up, and the reset pulse width
const SETTLE_MS: u32 = 20;

type Panel<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub(crate) struct Ssd1306Display<I2C> {
    panel: Panel<I2C>,
    reset: Option<Output<'static>>,
    rail: Option<&'static PowerRailMutex>,
    powered: bool,
}

impl<I2C: I2c> Ssd1306Display<I2C> {
    pub(crate) fn new(
        i2c: I2C,
        reset: Option<Output<'static>>,
        rail: Option<&'static PowerRailMutex>,
    ) -> Self {
        let panel = Ssd1306::new(
            I2CDisplayInterface::new(i2c),
            DisplaySize128x64,
            DisplayRotation::Rotate0,
        )
        .into_buffered_graphics_mode();

        Self {
            panel,
            reset,
            rail,
            powered: false,
        }
    }

    fn power_up(&mut self, delay: &Delay) {
        if self.powered {
            return;
        }
        if let Some(rail) = self.rail {
            rail.lock(|cell| cell.borrow_mut().claim());
            delay.delay_millis(SETTLE_MS);
        }
        self.powered = true;
    }

    fn pulse_reset(&mut self, delay: &Delay) {
        if let Some(reset) = self.reset.as_mut() {
            reset.set_low();
            delay.delay_millis(SETTLE_MS);
            reset.set_high();
            delay.delay_millis(SETTLE_MS);
        }
    }
}

impl<I2C: I2c> Display for Ssd1306Display<I2C> {
    fn begin(&mut self) -> Result<(), DisplayError> {
        let delay = Delay::new();
        self.power_up(&delay);
        self.pulse_reset(&delay);
        self.panel.init().map_err(|_| DisplayError::Init)
    }

    fn turn_on(&mut self) {
        let _ = self.panel.set_display_on(true);
    }

    fn start_frame(&mut self) {
        self.panel.clear_buffer();
    }

    fn end_frame(&mut self) -> Result<(), DisplayError> {
        self.panel.flush().map_err(|_| DisplayError::Bus)
    }

    fn draw_text(&mut self, x: u16, y: u16, size: TextSize, text: &str) {
        let font = match size {
            TextSize::Small => &FONT_6X10,
            TextSize::Large => &FONT_10X20,
        };
        let style = MonoTextStyle::new(font, BinaryColor::On);
        let position = Point::new(i32::from(x), i32::from(y));
        // Drawing only touches the frame buffer
        let _ = Text::with_baseline(text, position, style, Baseline::Top).draw(&mut self.panel);
    }

    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16) {
        let _ = Rectangle::new(
            Point::new(i32::from(x), i32::from(y)),
            Size::new(u32::from(width), u32::from(height)),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut self.panel);
    }

    fn width(&self) -> u16 {
        u16::from(self.panel.dimensions().0)
    }

    fn height(&self) -> u16 {
        u16::from(self.panel.dimensions().1)
    }
}

impl<I2C> Drop for Ssd1306Display<I2C> {
    fn drop(&mut self) {
        if let (true, Some(rail)) = (self.powered, self.rail) {
            rail.lock(|cell| cell.borrow_mut().release());
        }
    }
}
