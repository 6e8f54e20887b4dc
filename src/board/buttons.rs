//! GPIO edge handlers feeding the shared input capture.
//!
//! Buttons are active-low with internal pull-ups; encoder channels idle
//! high. Each handler only timestamps or samples and goes back to waiting:
//! debounce and classification happen in `MenuSystem::update()`.

use embassy_futures::select::select;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::Instant;

use crate::input::{Button, INPUT};

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Run a single button edge loop.
///
/// Records the press with its timestamp, then waits for release and
/// records the level change.
pub async fn button_task(pin: AnyPin, button: Button) -> ! {
    let mut btn = Input::new(pin, Pull::Up);
    INPUT.record_level(button, btn.is_low());

    loop {
        // Level waits return at once if the pin already changed, so a
        // bounce released before we re-arm still clears the level.
        btn.wait_for_low().await;
        INPUT.record_press(button, now_ms());

        btn.wait_for_high().await;
        INPUT.record_level(button, false);
    }
}

/// Sample both encoder channels on every edge of either one.
pub async fn encoder_task(a: AnyPin, b: AnyPin) -> ! {
    let mut a = Input::new(a, Pull::Up);
    let mut b = Input::new(b, Pull::Up);
    INPUT.seed_encoder(a.is_high(), b.is_high());

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;
        INPUT.record_encoder(a.is_high(), b.is_high());
    }
}
