//! Press resolution.
//!
//! The ISR only timestamps the pressed edge. Once the debounce window has
//! passed, the main loop re-samples the level: a released button means the
//! edge was noise, a held one becomes a click or (held long enough) a long
//! press.

use super::{Button, ButtonEvent, ButtonLevels, InputCapture, PressKind, PRESS_PENDING};
use crate::clock::elapsed;

#[derive(Debug)]
pub struct PressClassifier {
    debounce_ms: u32,
    long_press_ms: u32,
    encoder_button: bool,
}

impl PressClassifier {
    pub fn new(debounce_ms: u32, long_press_ms: u32) -> Self {
        Self {
            debounce_ms,
            long_press_ms,
            encoder_button: true,
        }
    }

    /// Whether the encoder push switch is wired. When it isn't, its press
    /// slot is never inspected.
    pub fn set_encoder_button(&mut self, present: bool) {
        self.encoder_button = present;
    }

    pub fn encoder_button(&self) -> bool {
        self.encoder_button
    }

    /// Resolve at most one pending press, in confirm, back, encoder order.
    pub fn poll<L: ButtonLevels>(
        &self,
        capture: &InputCapture,
        levels: &mut L,
        now_ms: u32,
    ) -> Option<ButtonEvent> {
        for button in Button::ALL {
            if button == Button::Encoder && !self.encoder_button {
                continue;
            }
            if let Some(event) = self.resolve(button, capture, levels, now_ms) {
                return Some(event);
            }
        }
        None
    }

    fn resolve<L: ButtonLevels>(
        &self,
        button: Button,
        capture: &InputCapture,
        levels: &mut L,
        now_ms: u32,
    ) -> Option<ButtonEvent> {
        let word = capture.press_word(button);
        if word & PRESS_PENDING == 0 {
            return None;
        }
        let pressed_at = word as u32;
        let held = elapsed(now_ms, pressed_at);
        // An edge stamped after `now_ms` was read wraps to a huge hold
        // time; it is not due yet.
        if held <= self.debounce_ms || held > u32::MAX / 2 {
            return None;
        }
        // A newer press landed between the load and here; leave it for
        // the next poll.
        if !capture.consume_press(button, word) {
            return None;
        }
        if !levels.is_pressed(button) {
            trace!("press on {} discarded as bounce", button);
            return None;
        }
        let kind = if held >= self.long_press_ms {
            PressKind::LongPress
        } else {
            PressKind::Click
        };
        Some(ButtonEvent::new(button, kind))
    }
}
