//! Integration tests for rotary-menu host-testable logic.
//!
//! These go through the public API only and render into an
//! `embedded-graphics` mock display, so pixels rather than draw calls are
//! checked.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;

use embedded_graphics::mock_display::MockDisplay;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use rotary_menu::render::graphics::{GraphicsSurface, Panel};
use rotary_menu::{
    Button, ButtonEvent, ChoiceItem, Clock, InputCapture, ManualClock, MenuConfig, MenuSystem,
    Mode, NumericItem, PinConfig, StatusSnapshot, Surface, TextBuffer, TextItem,
};

/// 64×64 mock panel that counts flushes.
struct Screen {
    display: MockDisplay<BinaryColor>,
    flushes: usize,
    contrast: Option<u8>,
}

impl Screen {
    fn new() -> Self {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        Self {
            display,
            flushes: 0,
            contrast: None,
        }
    }

    fn lit(&self, x: i32, y: i32) -> bool {
        self.display.get_pixel(Point::new(x, y)) == Some(BinaryColor::On)
    }

    fn lit_count(&self) -> usize {
        (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| self.lit(x, y))
            .count()
    }
}

impl OriginDimensions for Screen {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl DrawTarget for Screen {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl Panel for Screen {
    type BusError = Infallible;

    fn init_panel(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn flush_panel(&mut self) -> Result<(), Infallible> {
        self.flushes += 1;
        Ok(())
    }

    fn set_panel_contrast(&mut self, level: u8) {
        self.contrast = Some(level);
    }
}

type Sys<'a> = MenuSystem<'a, GraphicsSurface<Screen>, &'a InputCapture, &'a ManualClock>;

const PINS: PinConfig = PinConfig {
    encoder_a: 3,
    encoder_b: 4,
    encoder_button: Some(24),
    confirm: 11,
    back: 12,
};

fn system<'a>(capture: &'a InputCapture, clock: &'a ManualClock, config: MenuConfig) -> Sys<'a> {
    let config = config.with_geometry(64, 64).with_pulses_per_step(4);
    let surface = GraphicsSurface::new(Screen::new());
    let mut sys = MenuSystem::new(surface, capture, clock, capture, config);
    sys.begin(&PINS).expect("begin");
    sys
}

fn click(sys: &mut Sys<'_>, capture: &InputCapture, clock: &ManualClock, button: Button) {
    capture.record_press(button, clock.now_ms());
    clock.advance(60);
    sys.update();
    capture.record_level(button, false);
}

/// One clockwise (positive) or counter-clockwise detent per step.
fn turn(sys: &mut Sys<'_>, capture: &InputCapture, steps: i32) {
    let cw = [(false, true), (false, false), (true, false), (true, true)];
    let ccw = [(true, false), (false, false), (false, true), (true, true)];
    for _ in 0..steps.unsigned_abs() {
        let sequence = if steps > 0 { cw } else { ccw };
        for (a, b) in sequence {
            capture.record_encoder(a, b);
        }
    }
    sys.update();
}

#[test]
fn begin_draws_the_status_hint() {
    let capture = InputCapture::new();
    let clock = ManualClock::new(0);
    let sys = system(&capture, &clock, MenuConfig::default());

    let screen = sys.surface().panel();
    assert_eq!(sys.mode(), Mode::StatusScreen);
    // init flush plus the first frame
    assert_eq!(screen.flushes, 2);
    assert!(screen.lit_count() > 0);
    // nothing above the two hint lines
    assert!((0..28).all(|y| (0..64).all(|x| !screen.lit(x, y))));
}

#[test]
fn selected_row_is_drawn_inverted_and_follows_the_encoder() {
    let capture = InputCapture::new();
    let clock = ManualClock::new(0);
    let mut sys = system(&capture, &clock, MenuConfig::default());
    let root = sys.create_menu("Main").unwrap();
    sys.set_root_menu(root).unwrap();
    sys.add_info(root, "One").unwrap();
    sys.add_info(root, "Two").unwrap();

    click(&mut sys, &capture, &clock, Button::Encoder);
    assert_eq!(sys.mode(), Mode::MenuNavigation);
    // highlight bar starts one pixel above the first row
    assert!(sys.surface().panel().lit(0, 13));
    assert!(!sys.surface().panel().lit(0, 25));

    turn(&mut sys, &capture, 1);
    assert_eq!(sys.selected_index(), 1);
    assert!(!sys.surface().panel().lit(0, 13));
    assert!(sys.surface().panel().lit(0, 25));
}

#[test]
fn numeric_setting_round_trip_through_the_editor() {
    let capture = InputCapture::new();
    let clock = ManualClock::new(0);
    let volume = Cell::new(40);
    let saves = Cell::new(0);
    let saved = || saves.set(saves.get() + 1);

    let mut sys = system(&capture, &clock, MenuConfig::default());
    let root = sys.create_menu("Audio").unwrap();
    sys.set_root_menu(root).unwrap();
    let item = NumericItem::new(&volume, 0, 100)
        .step(5)
        .unit("%")
        .on_save(&saved);
    sys.add_numeric(root, "Volume", item).unwrap();

    click(&mut sys, &capture, &clock, Button::Encoder);
    click(&mut sys, &capture, &clock, Button::Confirm);
    assert_eq!(sys.mode(), Mode::NumericEntry);

    turn(&mut sys, &capture, 3);
    assert_eq!(volume.get(), 40);
    click(&mut sys, &capture, &clock, Button::Confirm);

    assert_eq!(volume.get(), 55);
    assert_eq!(saves.get(), 1);
    assert_eq!(sys.mode(), Mode::MenuNavigation);
}

#[test]
fn text_and_choice_settings_share_one_tree() {
    let capture = InputCapture::new();
    let clock = ManualClock::new(0);
    let name = RefCell::new(TextBuffer::new());
    let enabled = Cell::new(false);

    let mut sys = system(&capture, &clock, MenuConfig::default());
    let root = sys.create_menu("Setup").unwrap();
    sys.set_root_menu(root).unwrap();
    sys.add_string(root, "Name", TextItem::new(&name, 8).palette("AB")).unwrap();
    sys.add_either_or(root, "Radio", ChoiceItem::new(&enabled).options("Yes", "No"))
        .unwrap();

    click(&mut sys, &capture, &clock, Button::Encoder);
    click(&mut sys, &capture, &clock, Button::Confirm);
    assert_eq!(sys.mode(), Mode::StringEntry);
    turn(&mut sys, &capture, 1);
    click(&mut sys, &capture, &clock, Button::Encoder);
    click(&mut sys, &capture, &clock, Button::Encoder);
    click(&mut sys, &capture, &clock, Button::Confirm);
    assert_eq!(name.borrow().as_str(), "BA");

    turn(&mut sys, &capture, 1);
    click(&mut sys, &capture, &clock, Button::Confirm);
    assert_eq!(sys.mode(), Mode::EitherOrEntry);
    turn(&mut sys, &capture, -1);
    click(&mut sys, &capture, &clock, Button::Confirm);
    assert!(enabled.get());
}

#[test]
fn screen_saver_blanks_then_wakes_without_acting() {
    let capture = InputCapture::new();
    let clock = ManualClock::new(0);
    let mut sys = system(&capture, &clock, MenuConfig::default().with_screen_saver_ms(1_000));
    let root = sys.create_menu("Main").unwrap();
    sys.set_root_menu(root).unwrap();
    sys.add_info(root, "One").unwrap();

    clock.advance(1_500);
    sys.update();
    assert!(sys.is_screen_saver_active());
    assert_eq!(sys.surface().panel().lit_count(), 0);

    let flushes = sys.surface().panel().flushes;
    clock.advance(100);
    sys.update();
    assert_eq!(sys.surface().panel().flushes, flushes);

    click(&mut sys, &capture, &clock, Button::Encoder);
    assert!(!sys.is_screen_saver_active());
    assert_eq!(sys.mode(), Mode::StatusScreen);
    assert!(sys.surface().panel().lit_count() > 0);
}

#[test]
fn status_hooks_see_input_before_the_menu() {
    let capture = InputCapture::new();
    let clock = ManualClock::new(0);
    let frames = Cell::new((0u32, 0u32));
    let events = RefCell::new(Vec::new());
    let turned = Cell::new(0);

    let mut render = |surface: &mut GraphicsSurface<Screen>, width: u32, height: u32| {
        frames.set((width, height));
        surface.fill_rect(Rectangle::new(Point::zero(), Size::new(4, 4)), BinaryColor::On);
    };
    let mut input = |event: ButtonEvent| {
        events.borrow_mut().push(event);
        event == ButtonEvent::ConfirmClick
    };
    let mut encoder = |steps: i32| turned.set(turned.get() + steps);

    let mut sys = system(&capture, &clock, MenuConfig::default());
    let root = sys.create_menu("Main").unwrap();
    sys.set_root_menu(root).unwrap();
    sys.set_status_render_hook(&mut render);
    sys.set_status_input_hook(&mut input);
    sys.set_status_encoder_hook(&mut encoder);

    turn(&mut sys, &capture, -2);
    assert_eq!(turned.get(), -2);
    assert_eq!(frames.get(), (64, 64));
    assert!(sys.surface().panel().lit(0, 0));

    click(&mut sys, &capture, &clock, Button::Confirm);
    assert_eq!(sys.mode(), Mode::StatusScreen);

    // not consumed by the hook, so the encoder still opens the menu
    click(&mut sys, &capture, &clock, Button::Encoder);
    assert_eq!(sys.mode(), Mode::MenuNavigation);
    assert_eq!(
        *events.borrow(),
        [ButtonEvent::ConfirmClick, ButtonEvent::EncoderClick]
    );
}

#[test]
fn status_snapshot_and_flash_message() {
    let capture = InputCapture::new();
    let clock = ManualClock::new(0);
    let status = StatusSnapshot::new();
    status.set_connected(true);
    status.set_address("10.0.0.7");

    let mut sys = system(&capture, &clock, MenuConfig::default());
    sys.set_status_data(&status);
    sys.update();
    // connection line at the top of the screen
    assert!((0..10).any(|y| (0..64).any(|x| sys.surface().panel().lit(x, y))));

    sys.show_flash_message("Saved", 500);
    assert_eq!(sys.mode(), Mode::FlashMessage);
    clock.advance(600);
    sys.update();
    assert_eq!(sys.mode(), Mode::StatusScreen);

    sys.set_contrast(0x40);
    assert_eq!(sys.surface().panel().contrast, Some(0x40));
}
