//! [`Surface`] over an `embedded-graphics` monochrome draw target.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use super::Surface;

/// A framebuffered monochrome panel: an `embedded-graphics` draw target
/// plus the few driver calls drawing alone doesn't cover.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    type BusError;

    fn init_panel(&mut self) -> Result<(), Self::BusError>;
    fn flush_panel(&mut self) -> Result<(), Self::BusError>;
    fn set_panel_contrast(&mut self, level: u8);
}

pub struct GraphicsSurface<P> {
    panel: P,
    cursor: Point,
    size: u8,
    color: BinaryColor,
}

impl<P: Panel> GraphicsSurface<P> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            cursor: Point::zero(),
            size: 1,
            color: BinaryColor::On,
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    fn text_style(&self) -> MonoTextStyle<'static, BinaryColor> {
        let font = if self.size <= 1 { &FONT_6X10 } else { &FONT_10X20 };
        MonoTextStyleBuilder::new()
            .font(font)
            .text_color(self.color)
            .build()
    }
}

impl<P: Panel> Surface for GraphicsSurface<P> {
    type Error = P::BusError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.panel.init_panel()?;
        let _ = self.panel.clear(BinaryColor::Off);
        self.panel.flush_panel()
    }

    fn clear(&mut self) {
        let _ = self.panel.clear(BinaryColor::Off);
        self.cursor = Point::zero();
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn set_text_size(&mut self, size: u8) {
        self.size = size.max(1);
    }

    fn text_size(&self) -> u8 {
        self.size
    }

    fn set_text_color(&mut self, color: BinaryColor) {
        self.color = color;
    }

    fn print(&mut self, text: &str) {
        let style = self.text_style();
        if let Ok(next) =
            Text::with_baseline(text, self.cursor, style, Baseline::Top).draw(&mut self.panel)
        {
            self.cursor.x = next.x;
        }
    }

    fn draw_line(&mut self, start: Point, end: Point, color: BinaryColor) {
        let _ = Line::new(start, end)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.panel);
    }

    fn draw_rect(&mut self, rect: Rectangle, color: BinaryColor) {
        let _ = rect
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.panel);
    }

    fn fill_rect(&mut self, rect: Rectangle, color: BinaryColor) {
        let _ = rect
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.panel);
    }

    fn set_contrast(&mut self, level: u8) {
        self.panel.set_panel_contrast(level);
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.panel.flush_panel()
    }
}
