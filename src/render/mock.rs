//! Recording surface for host tests.

use std::string::String;
use std::vec::Vec;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;

use super::Surface;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear,
    Print {
        text: String,
        at: Point,
        size: u8,
        color: BinaryColor,
    },
    Line(Point, Point),
    Rect(Rectangle, BinaryColor),
    Fill(Rectangle, BinaryColor),
    Contrast(u8),
    Present,
}

pub struct RecordingSurface {
    pub ops: Vec<Op>,
    pub fail_init: bool,
    cursor: Point,
    size: u8,
    color: BinaryColor,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            fail_init: false,
            cursor: Point::zero(),
            size: 1,
            color: BinaryColor::On,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::new()
        }
    }

    /// Text printed since the last clear, in order.
    pub fn printed(&self) -> Vec<&str> {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, Op::Clear))
            .map_or(0, |i| i + 1);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                Op::Print { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn printed_text(&self) -> String {
        self.printed().concat()
    }

    /// Colour the most recent print of `text` used.
    pub fn color_of(&self, text: &str) -> Option<BinaryColor> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::Print { text: t, color, .. } if t == text => Some(*color),
            _ => None,
        })
    }

    pub fn presents(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Present)).count()
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        if self.fail_init {
            Err(())
        } else {
            Ok(())
        }
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn set_text_size(&mut self, size: u8) {
        self.size = size;
    }

    fn text_size(&self) -> u8 {
        self.size
    }

    fn set_text_color(&mut self, color: BinaryColor) {
        self.color = color;
    }

    fn print(&mut self, text: &str) {
        self.ops.push(Op::Print {
            text: text.into(),
            at: self.cursor,
            size: self.size,
            color: self.color,
        });
        self.cursor.x += self.text_width(text) as i32;
    }

    fn draw_line(&mut self, start: Point, end: Point, _color: BinaryColor) {
        self.ops.push(Op::Line(start, end));
    }

    fn draw_rect(&mut self, rect: Rectangle, color: BinaryColor) {
        self.ops.push(Op::Rect(rect, color));
    }

    fn fill_rect(&mut self, rect: Rectangle, color: BinaryColor) {
        self.ops.push(Op::Fill(rect, color));
    }

    fn set_contrast(&mut self, level: u8) {
        self.ops.push(Op::Contrast(level));
    }

    fn present(&mut self) -> Result<(), ()> {
        self.ops.push(Op::Present);
        Ok(())
    }
}
