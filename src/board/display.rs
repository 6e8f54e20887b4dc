//! SSD1306 OLED display wrapper.

use embedded_graphics::draw_target::DrawTarget;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::render::graphics::{GraphicsSurface, Panel};

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Wrap the I²C bus in a menu surface. The panel itself is initialised by
/// `MenuSystem::begin()`.
pub fn surface<I2C>(i2c: I2C) -> GraphicsSurface<Display<I2C>>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    GraphicsSurface::new(display)
}

impl<I2C> Panel for Display<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type BusError = <Self as DrawTarget>::Error;

    fn init_panel(&mut self) -> Result<(), Self::BusError> {
        self.init()?;
        self.clear_buffer();
        Ok(())
    }

    fn flush_panel(&mut self) -> Result<(), Self::BusError> {
        self.flush()
    }

    fn set_panel_contrast(&mut self, level: u8) {
        let _ = self.set_brightness(Brightness::custom(1, level));
    }
}
