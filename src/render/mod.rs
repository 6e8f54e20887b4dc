//! Per-mode screen layouts drawn against an abstract [`Surface`].
//!
//! Every routine here is a pure function of the view it is handed: the
//! mode controller collects what is on screen (labels, values, selection)
//! and the renderer only turns that into draw calls. Layouts target a
//! 128×64 monochrome panel and scale horizontally with the geometry.

pub mod graphics;

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::config::{Geometry, ROW_HEIGHT, TITLE_HEIGHT};
use crate::status::StatusSnapshot;

/// Cursor-and-print drawing surface, in the style of the classic OLED
/// text APIs. Coordinates are pixels; text is drawn with its top edge at
/// the cursor and advances the cursor horizontally.
pub trait Surface {
    type Error;

    fn init(&mut self) -> Result<(), Self::Error>;
    fn clear(&mut self);
    fn set_cursor(&mut self, x: i32, y: i32);
    /// 1 is the small font; 2 and up select the large one.
    fn set_text_size(&mut self, size: u8);
    fn text_size(&self) -> u8;
    fn set_text_color(&mut self, color: BinaryColor);
    fn print(&mut self, text: &str);
    fn draw_line(&mut self, start: Point, end: Point, color: BinaryColor);
    fn draw_rect(&mut self, rect: Rectangle, color: BinaryColor);
    fn fill_rect(&mut self, rect: Rectangle, color: BinaryColor);
    fn set_contrast(&mut self, level: u8);
    /// Push the frame to the panel.
    fn present(&mut self) -> Result<(), Self::Error>;

    /// Pixel width of `text` at the current text size.
    fn text_width(&self, text: &str) -> u32 {
        glyph_size(self.text_size()).width * text.chars().count() as u32
    }

    fn text_height(&self) -> u32 {
        glyph_size(self.text_size()).height
    }
}

/// Cell size of one glyph at a text size.
pub const fn glyph_size(size: u8) -> Size {
    if size <= 1 {
        Size::new(6, 10)
    } else {
        Size::new(10, 20)
    }
}

/// First row's top edge, just under the title rule.
const FIRST_ROW_Y: i32 = TITLE_HEIGHT as i32 + 2;

fn centered_x<D: Surface + ?Sized>(surface: &D, geometry: &Geometry, text: &str) -> i32 {
    ((geometry.width as i32 - surface.text_width(text) as i32) / 2).max(0)
}

fn draw_title<D: Surface + ?Sized>(surface: &mut D, geometry: &Geometry, title: &str) {
    surface.set_text_size(1);
    surface.set_text_color(BinaryColor::On);
    surface.set_cursor(0, 0);
    surface.print(title);
    let rule_y = TITLE_HEIGHT as i32 - 2;
    surface.draw_line(
        Point::new(0, rule_y),
        Point::new(geometry.width as i32 - 1, rule_y),
        BinaryColor::On,
    );
}

fn bottom_line_y(geometry: &Geometry) -> i32 {
    geometry.height as i32 - glyph_size(1).height as i32
}

// ── Status screen ───────────────────────────────────────────────────────

/// Built-in status layout used when no render hook is installed.
pub fn draw_status<D: Surface + ?Sized>(
    surface: &mut D,
    geometry: &Geometry,
    status: Option<&StatusSnapshot>,
) {
    surface.set_text_size(1);
    surface.set_text_color(BinaryColor::On);

    let Some(status) = status else {
        let (first, second) = ("Press encoder", "for menu");
        let x = centered_x(surface, geometry, first);
        surface.set_cursor(x, 28);
        surface.print(first);
        let x = centered_x(surface, geometry, second);
        surface.set_cursor(x, 38);
        surface.print(second);
        return;
    };

    surface.set_cursor(0, 0);
    if status.connected() {
        surface.print("WiFi: Connected");
        surface.set_cursor(0, 12);
        surface.print("IP: ");
        surface.print(status.address().as_str());
    } else {
        surface.print("WiFi: Disconnected");
    }

    let hint_y = bottom_line_y(geometry);
    surface.draw_line(
        Point::new(0, hint_y - 4),
        Point::new(geometry.width as i32 - 1, hint_y - 4),
        BinaryColor::On,
    );
    surface.set_cursor(0, hint_y);
    surface.print("[Press Enc for Menu]");
}

// ── Menu navigation ─────────────────────────────────────────────────────

/// One visible menu row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuRow<'v> {
    pub label: &'v str,
    pub submenu: bool,
    pub selected: bool,
}

/// Title bar plus the visible window of rows. The selected row is drawn
/// inverted and submenus carry a `>` marker.
pub fn draw_menu<D: Surface + ?Sized>(
    surface: &mut D,
    geometry: &Geometry,
    title: &str,
    rows: &[MenuRow<'_>],
) {
    draw_title(surface, geometry, title);

    for (i, row) in rows.iter().enumerate() {
        let y = FIRST_ROW_Y + (i as i32) * ROW_HEIGHT as i32;
        if row.selected {
            surface.fill_rect(
                Rectangle::new(Point::new(0, y - 1), Size::new(geometry.width, ROW_HEIGHT)),
                BinaryColor::On,
            );
            surface.set_text_color(BinaryColor::Off);
        } else {
            surface.set_text_color(BinaryColor::On);
        }
        surface.set_cursor(2, y);
        surface.print(row.label);
        if row.submenu {
            surface.set_cursor(geometry.width as i32 - 10, y);
            surface.print(">");
        }
    }
    surface.set_text_color(BinaryColor::On);
}

// ── Editing ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericView<'v> {
    pub title: &'v str,
    pub value: i32,
    pub min: i32,
    pub max: i32,
    pub unit: &'v str,
}

pub fn draw_numeric<D: Surface + ?Sized>(
    surface: &mut D,
    geometry: &Geometry,
    view: &NumericView<'_>,
) {
    draw_title(surface, geometry, view.title);

    let mut value: heapless::String<12> = heapless::String::new();
    let _ = write!(value, "{}", view.value);
    surface.set_text_size(3);
    let value_width = surface.text_width(&value) as i32;
    let x = centered_x(surface, geometry, &value);
    surface.set_cursor(x, 24);
    surface.print(&value);

    surface.set_text_size(1);
    if !view.unit.is_empty() {
        surface.set_cursor(x + value_width + 4, 34);
        surface.print(view.unit);
    }

    let mut bound: heapless::String<12> = heapless::String::new();
    let y = bottom_line_y(geometry);
    let _ = write!(bound, "{}", view.min);
    surface.set_cursor(0, y);
    surface.print(&bound);
    bound.clear();
    let _ = write!(bound, "{}", view.max);
    let x = geometry.width as i32 - surface.text_width(&bound) as i32;
    surface.set_cursor(x.max(0), y);
    surface.print(&bound);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextView<'v> {
    pub title: &'v str,
    pub buffer: &'v str,
    pub current: char,
    pub previous: char,
    pub next: char,
}

pub fn draw_text_entry<D: Surface + ?Sized>(
    surface: &mut D,
    geometry: &Geometry,
    view: &TextView<'_>,
) {
    draw_title(surface, geometry, view.title);

    surface.set_cursor(2, FIRST_ROW_Y);
    surface.print(view.buffer);
    surface.print("_");

    let mut glyph = [0u8; 4];
    let current = view.current.encode_utf8(&mut glyph);
    surface.set_text_size(2);
    let x = centered_x(surface, geometry, current);
    surface.set_cursor(x, 28);
    surface.print(current);

    surface.set_text_size(1);
    let previous = view.previous.encode_utf8(&mut glyph);
    surface.set_cursor(4, 34);
    surface.print(previous);
    let next = view.next.encode_utf8(&mut glyph);
    surface.set_cursor(geometry.width as i32 - 10, 34);
    surface.print(next);

    surface.set_cursor(0, bottom_line_y(geometry));
    surface.print("Enc:Add OK:Done");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceView<'v> {
    pub title: &'v str,
    pub first: &'v str,
    pub second: &'v str,
    /// `true` selects the first option.
    pub value: bool,
}

pub fn draw_either_or<D: Surface + ?Sized>(
    surface: &mut D,
    geometry: &Geometry,
    view: &ChoiceView<'_>,
) {
    draw_title(surface, geometry, view.title);

    let box_width = (geometry.width.saturating_sub(12)) / 2;
    let boxes = [
        (4, view.first, view.value),
        (geometry.width as i32 / 2 + 2, view.second, !view.value),
    ];
    for (x, label, selected) in boxes {
        let frame = Rectangle::new(Point::new(x, 20), Size::new(box_width, 30));
        if selected {
            surface.fill_rect(frame, BinaryColor::On);
            surface.set_text_color(BinaryColor::Off);
        } else {
            surface.draw_rect(frame, BinaryColor::On);
            surface.set_text_color(BinaryColor::On);
        }
        let text_x = x + (box_width as i32 - surface.text_width(label) as i32).max(0) / 2;
        surface.set_cursor(text_x, 30);
        surface.print(label);
    }
    surface.set_text_color(BinaryColor::On);
}

// ── Flash message ───────────────────────────────────────────────────────

/// Centred, double-bordered box sized to the message.
pub fn draw_flash<D: Surface + ?Sized>(surface: &mut D, geometry: &Geometry, message: &str) {
    surface.set_text_size(1);
    let width = (surface.text_width(message) + 16).min(geometry.width);
    let height = (surface.text_height() + 16).min(geometry.height);
    let origin = Point::new(
        (geometry.width - width) as i32 / 2,
        (geometry.height - height) as i32 / 2,
    );
    let outer = Rectangle::new(origin, Size::new(width, height));
    surface.fill_rect(outer, BinaryColor::Off);
    surface.draw_rect(outer, BinaryColor::On);
    surface.draw_rect(outer.offset(-2), BinaryColor::On);

    surface.set_text_color(BinaryColor::On);
    surface.set_cursor(origin.x + 8, origin.y + 8);
    surface.print(message);
}

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
mod tests {
    use super::mock::{Op, RecordingSurface};
    use super::*;

    fn geometry() -> Geometry {
        Geometry::default()
    }

    #[test]
    fn status_without_data_draws_hint() {
        let mut surface = RecordingSurface::new();
        draw_status(&mut surface, &geometry(), None);
        assert_eq!(surface.printed(), ["Press encoder", "for menu"]);
    }

    #[test]
    fn status_shows_address_only_when_connected() {
        let status = StatusSnapshot::new();
        status.set_address("10.0.0.7");
        let mut surface = RecordingSurface::new();
        draw_status(&mut surface, &geometry(), Some(&status));
        assert!(surface.printed_text().contains("WiFi: Disconnected"));
        assert!(!surface.printed_text().contains("10.0.0.7"));

        status.set_connected(true);
        let mut surface = RecordingSurface::new();
        draw_status(&mut surface, &geometry(), Some(&status));
        assert!(surface.printed_text().contains("IP: 10.0.0.7"));
        assert!(surface.printed_text().contains("[Press Enc for Menu]"));
    }

    #[test]
    fn selected_row_is_inverted_and_submenus_marked() {
        let rows = [
            MenuRow { label: "Radio", submenu: true, selected: false },
            MenuRow { label: "Volume", submenu: false, selected: true },
        ];
        let mut surface = RecordingSurface::new();
        draw_menu(&mut surface, &geometry(), "Main", &rows);

        assert_eq!(surface.printed(), ["Main", "Radio", ">", "Volume"]);
        let fill = surface
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Fill(rect, BinaryColor::On) => Some(*rect),
                _ => None,
            })
            .unwrap();
        // second row
        assert_eq!(fill.top_left.y, FIRST_ROW_Y + ROW_HEIGHT as i32 - 1);
        assert_eq!(surface.color_of("Volume"), Some(BinaryColor::Off));
        assert_eq!(surface.color_of("Radio"), Some(BinaryColor::On));
    }

    #[test]
    fn numeric_shows_value_unit_and_range() {
        let mut surface = RecordingSurface::new();
        let view = NumericView { title: "Volume", value: -3, min: -10, max: 10, unit: "dB" };
        draw_numeric(&mut surface, &geometry(), &view);
        assert_eq!(surface.printed(), ["Volume", "-3", "dB", "-10", "10"]);
    }

    #[test]
    fn text_entry_shows_buffer_cursor_and_palette_neighbours() {
        let mut surface = RecordingSurface::new();
        let view = TextView { title: "Name", buffer: "AB", current: 'C', previous: 'B', next: 'D' };
        draw_text_entry(&mut surface, &geometry(), &view);
        assert_eq!(
            surface.printed(),
            ["Name", "AB", "_", "C", "B", "D", "Enc:Add OK:Done"]
        );
    }

    #[test]
    fn either_or_fills_the_selected_box() {
        let mut surface = RecordingSurface::new();
        let view = ChoiceView { title: "Mode", first: "Radio", second: "BT", value: false };
        draw_either_or(&mut surface, &geometry(), &view);
        assert_eq!(surface.color_of("Radio"), Some(BinaryColor::On));
        assert_eq!(surface.color_of("BT"), Some(BinaryColor::Off));
    }

    #[test]
    fn flash_box_is_centred_and_clamped() {
        let mut surface = RecordingSurface::new();
        draw_flash(&mut surface, &geometry(), "Saved");
        let outer = surface
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Rect(rect, _) => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!(outer.size, Size::new(5 * 6 + 16, 10 + 16));
        assert_eq!(outer.top_left, Point::new((128 - 46) / 2, (64 - 26) / 2));

        let mut surface = RecordingSurface::new();
        draw_flash(&mut surface, &geometry(), "A message that is much wider than the panel");
        let outer = surface
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Rect(rect, _) => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!(outer.size.width, 128);
        assert_eq!(outer.top_left.x, 0);
    }
}
