//! nRF52840 board glue (feature `embedded`).
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×64 OLED via I²C
//! - **Buttons**: confirm, back and encoder push switch, active-low
//! - **Encoder**: two-channel quadrature on GPIOTE edges

pub mod buttons;
pub mod display;

use embassy_time::Instant;

use crate::clock::Clock;

/// Milliseconds since boot from the Embassy time driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the intended wrap; timers compare with wrapping_sub.
        Instant::now().as_millis() as u32
    }
}
