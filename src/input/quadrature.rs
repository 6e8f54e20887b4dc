//! Quadrature decoding.
//!
//! The ISR side turns AB level pairs into signed pulses through a 16-entry
//! transition table; the main-loop side turns pulses into whole steps.

use super::InputCapture;

/// Pulse contributed by a `(prev << 2) | curr` transition. Zero entries are
/// either no-ops or illegal double transitions.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

#[inline]
pub(crate) const fn ab_from_levels(a_high: bool, b_high: bool) -> u8 {
    ((a_high as u8) << 1) | (b_high as u8)
}

#[inline]
pub(crate) fn transition(prev: u8, curr: u8) -> i8 {
    TRANSITIONS[(((prev & 0b11) << 2) | (curr & 0b11)) as usize]
}

/// Converts the raw pulse counter into steps for the main loop.
///
/// Pulses that don't add up to a whole step are carried to the next poll,
/// so slow turning is never lost.
#[derive(Debug)]
pub struct StepDecoder {
    last_raw: i32,
    remainder: i32,
    pulses_per_step: i32,
}

impl StepDecoder {
    /// `pulses_per_step` of 0 is treated as 1.
    pub fn new(pulses_per_step: u8) -> Self {
        Self {
            last_raw: 0,
            remainder: 0,
            pulses_per_step: i32::from(pulses_per_step.max(1)),
        }
    }

    /// Start counting from the capture's current value.
    pub fn sync(&mut self, capture: &InputCapture) {
        self.last_raw = capture.pulses();
        self.remainder = 0;
    }

    /// Whole steps since the previous poll; positive is clockwise.
    pub fn poll(&mut self, capture: &InputCapture) -> i32 {
        let raw = capture.pulses();
        let delta = raw.wrapping_sub(self.last_raw);
        self.last_raw = raw;
        if delta == 0 {
            return 0;
        }
        let total = self.remainder.saturating_add(delta);
        // Truncating division keeps the sign of the remainder with the
        // direction of travel.
        let steps = total / self.pulses_per_step;
        self.remainder = total % self.pulses_per_step;
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn_clockwise(capture: &InputCapture, detents: usize) {
        for _ in 0..detents {
            capture.record_encoder(false, true);
            capture.record_encoder(false, false);
            capture.record_encoder(true, false);
            capture.record_encoder(true, true);
        }
    }

    fn turn_counter_clockwise(capture: &InputCapture, detents: usize) {
        for _ in 0..detents {
            capture.record_encoder(true, false);
            capture.record_encoder(false, false);
            capture.record_encoder(false, true);
            capture.record_encoder(true, true);
        }
    }

    #[test]
    fn table_is_antisymmetric() {
        for prev in 0..4u8 {
            for curr in 0..4u8 {
                assert_eq!(transition(prev, curr), -transition(curr, prev));
            }
        }
    }

    #[test]
    fn one_detent_at_two_pulses_per_step() {
        let capture = InputCapture::new();
        let mut decoder = StepDecoder::new(2);
        turn_clockwise(&capture, 1);
        assert_eq!(decoder.poll(&capture), 2);
        assert_eq!(decoder.poll(&capture), 0);
    }

    #[test]
    fn directions_have_opposite_sign() {
        let capture = InputCapture::new();
        let mut decoder = StepDecoder::new(4);
        turn_clockwise(&capture, 1);
        let cw = decoder.poll(&capture);
        turn_counter_clockwise(&capture, 1);
        let ccw = decoder.poll(&capture);
        assert_eq!(cw, -ccw);
        assert_eq!(cw.abs(), 1);
    }

    #[test]
    fn partial_steps_carry_over() {
        let capture = InputCapture::new();
        let mut decoder = StepDecoder::new(4);
        capture.record_encoder(false, true);
        capture.record_encoder(false, false);
        assert_eq!(decoder.poll(&capture), 0);
        capture.record_encoder(true, false);
        capture.record_encoder(true, true);
        assert_eq!(decoder.poll(&capture).abs(), 1);
    }

    #[test]
    fn sync_discards_history() {
        let capture = InputCapture::new();
        turn_clockwise(&capture, 3);
        let mut decoder = StepDecoder::new(2);
        decoder.sync(&capture);
        assert_eq!(decoder.poll(&capture), 0);
    }

    #[test]
    fn zero_pulses_per_step_means_one() {
        let capture = InputCapture::new();
        let mut decoder = StepDecoder::new(0);
        capture.record_encoder(false, true);
        assert_eq!(decoder.poll(&capture).abs(), 1);
    }
}
