//! Application-wide constants and runtime configuration.
//!
//! Timing defaults, buffer capacities and display geometry live here so
//! they can be tuned in one place. `MenuConfig` carries the values that
//! can be changed per device at construction time.

use crate::error::Error;

// Timing

/// Button debounce window (ms).
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// Held time at resolution that turns a click into a long press (ms).
pub const DEFAULT_LONG_PRESS_MS: u32 = 500;

/// Raw quadrature transitions per reported encoder step.
pub const DEFAULT_PULSES_PER_STEP: u8 = 2;

/// Inactivity before the menu falls back to the status screen (ms).
pub const DEFAULT_MENU_TIMEOUT_MS: u32 = 10_000;

/// Default flash message duration (ms).
pub const DEFAULT_FLASH_MS: u32 = 2_000;

// Display (SSD1306 / SH1106 class panels)

pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

/// Height of one menu row in pixels.
pub const ROW_HEIGHT: u32 = 12;

/// Height reserved for the title bar, including the rule under it.
pub const TITLE_HEIGHT: u32 = 12;

/// Upper bound on rows the menu renderer will ever lay out.
pub const MAX_VISIBLE_ROWS: usize = 8;

// Buffers

/// Maximum characters in a menu label.
pub const LABEL_LEN: usize = 20;

/// Maximum characters in a flash message.
pub const FLASH_MESSAGE_LEN: usize = 63;

/// Capacity of a bound text slot (includes room for the terminator the
/// max-length accounting reserves).
pub const TEXT_CAPACITY: usize = 64;

/// Capacity of the status address field (dotted IPv4).
pub const ADDRESS_LEN: usize = 15;

/// Total nodes the menu arena can hold.
pub const MAX_MENU_NODES: usize = 64;

/// Character palette offered by string entry when none is given.
pub const DEFAULT_PALETTE: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+@#*%&/()=?!$-_ ";

/// Display size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of menu rows that fit under the title bar.
    pub fn visible_rows(&self) -> usize {
        let start = TITLE_HEIGHT + 2;
        let available = self.height.saturating_sub(start + 2);
        ((available / ROW_HEIGHT) as usize).clamp(1, MAX_VISIBLE_ROWS)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

/// Construction-time behaviour of the menu system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuConfig {
    pub geometry: Geometry,
    pub debounce_ms: u32,
    pub long_press_ms: u32,
    pub pulses_per_step: u8,
    pub wraparound: bool,
    /// 0 disables the screen saver.
    pub screen_saver_ms: u32,
    /// 0 disables the menu timeout.
    pub menu_timeout_ms: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            pulses_per_step: DEFAULT_PULSES_PER_STEP,
            wraparound: false,
            screen_saver_ms: 0,
            menu_timeout_ms: DEFAULT_MENU_TIMEOUT_MS,
        }
    }
}

impl MenuConfig {
    pub const fn with_geometry(mut self, width: u32, height: u32) -> Self {
        self.geometry = Geometry::new(width, height);
        self
    }

    pub const fn with_debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub const fn with_long_press_ms(mut self, long_press_ms: u32) -> Self {
        self.long_press_ms = long_press_ms;
        self
    }

    pub const fn with_pulses_per_step(mut self, pulses_per_step: u8) -> Self {
        self.pulses_per_step = pulses_per_step;
        self
    }

    pub const fn with_wraparound(mut self, wraparound: bool) -> Self {
        self.wraparound = wraparound;
        self
    }

    pub const fn with_screen_saver_ms(mut self, screen_saver_ms: u32) -> Self {
        self.screen_saver_ms = screen_saver_ms;
        self
    }

    pub const fn with_menu_timeout_ms(mut self, menu_timeout_ms: u32) -> Self {
        self.menu_timeout_ms = menu_timeout_ms;
        self
    }
}

/// Logical pin assignments handed to `begin()`.
///
/// Numbers are board GPIO indices; the board layer maps them to real
/// peripherals. The encoder push switch is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub encoder_a: u8,
    pub encoder_b: u8,
    pub encoder_button: Option<u8>,
    pub confirm: u8,
    pub back: u8,
}

impl PinConfig {
    /// Reject assignments where two inputs share a pin.
    pub fn validate(&self) -> Result<(), Error> {
        let mut pins: heapless::Vec<u8, 5> = heapless::Vec::new();
        let assigned = [
            Some(self.encoder_a),
            Some(self.encoder_b),
            self.encoder_button,
            Some(self.confirm),
            Some(self.back),
        ];
        for pin in assigned.into_iter().flatten() {
            if pins.contains(&pin) {
                return Err(Error::PinConflict(pin));
            }
            let _ = pins.push(pin);
        }
        Ok(())
    }
}
