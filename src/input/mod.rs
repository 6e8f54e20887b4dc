//! Input capture - the state shared between interrupt handlers and the
//! main loop.
//!
//! Edge handlers call the `record_*` methods on [`InputCapture`]; each one
//! is O(1), lock-free, never allocates and never logs. Decoding happens in
//! the main loop:
//!
//! - [`quadrature::StepDecoder`] turns the raw pulse counter into steps
//! - [`debounce::PressClassifier`] turns press timestamps into events
//!
//! There is exactly one physical input device, so the board wires its
//! edge handlers to the process-wide [`INPUT`] instance. Host tests build
//! their own `InputCapture` and pass it by reference.

pub mod debounce;
pub mod quadrature;

use embedded_hal::digital::InputPin;
use portable_atomic::{AtomicBool, AtomicI32, AtomicU64, AtomicU8, Ordering};

/// The single capture instance the board's edge handlers feed.
pub static INPUT: InputCapture = InputCapture::new();

/// Physical push buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Confirm,
    Back,
    Encoder,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Confirm, Button::Back, Button::Encoder];

    const fn slot(self) -> usize {
        match self {
            Button::Confirm => 0,
            Button::Back => 1,
            Button::Encoder => 2,
        }
    }
}

/// How long a resolved press was held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    Click,
    LongPress,
}

/// Debounced, classified button events consumed by the mode controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    ConfirmClick,
    BackClick,
    EncoderClick,
    ConfirmLong,
    BackLong,
    EncoderLong,
}

impl ButtonEvent {
    pub const fn new(button: Button, kind: PressKind) -> Self {
        match (button, kind) {
            (Button::Confirm, PressKind::Click) => ButtonEvent::ConfirmClick,
            (Button::Back, PressKind::Click) => ButtonEvent::BackClick,
            (Button::Encoder, PressKind::Click) => ButtonEvent::EncoderClick,
            (Button::Confirm, PressKind::LongPress) => ButtonEvent::ConfirmLong,
            (Button::Back, PressKind::LongPress) => ButtonEvent::BackLong,
            (Button::Encoder, PressKind::LongPress) => ButtonEvent::EncoderLong,
        }
    }

    pub const fn button(self) -> Button {
        match self {
            ButtonEvent::ConfirmClick | ButtonEvent::ConfirmLong => Button::Confirm,
            ButtonEvent::BackClick | ButtonEvent::BackLong => Button::Back,
            ButtonEvent::EncoderClick | ButtonEvent::EncoderLong => Button::Encoder,
        }
    }

    pub const fn is_long(self) -> bool {
        matches!(
            self,
            ButtonEvent::ConfirmLong | ButtonEvent::BackLong | ButtonEvent::EncoderLong
        )
    }
}

/// Pending bit of a packed press word; the low 32 bits hold the timestamp.
pub(crate) const PRESS_PENDING: u64 = 1 << 32;

/// Encoder channels idle high (pull-ups).
const ENCODER_IDLE: u8 = 0b11;

/// Fields written from interrupt context and read by the main loop.
pub struct InputCapture {
    /// Last sampled AB level pair of the encoder.
    encoder_state: AtomicU8,
    /// Net legal quadrature transitions since boot (wrapping).
    pulses: AtomicI32,
    /// Per button: `PRESS_PENDING | timestamp_ms`, or 0 when idle.
    presses: [AtomicU64; 3],
    /// Per button: last level the edge handler saw (true = pressed).
    levels: [AtomicBool; 3],
}

impl Default for InputCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl InputCapture {
    pub const fn new() -> Self {
        Self {
            encoder_state: AtomicU8::new(ENCODER_IDLE),
            pulses: AtomicI32::new(0),
            presses: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
            levels: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    /// Seed the encoder state from the levels read at start-up so the
    /// first real edge is decoded against the right baseline.
    pub fn seed_encoder(&self, a_high: bool, b_high: bool) {
        self.encoder_state
            .store(quadrature::ab_from_levels(a_high, b_high), Ordering::Release);
    }

    /// Encoder channel edge (ISR). Illegal or no-op transitions are dropped.
    #[inline]
    pub fn record_encoder(&self, a_high: bool, b_high: bool) {
        let curr = quadrature::ab_from_levels(a_high, b_high);
        let prev = self.encoder_state.swap(curr, Ordering::AcqRel);
        let delta = quadrature::transition(prev, curr);
        if delta != 0 {
            self.pulses.fetch_add(i32::from(delta), Ordering::Release);
        }
    }

    /// Pressed edge of a button (ISR). A newer press overwrites an older
    /// unresolved one.
    #[inline]
    pub fn record_press(&self, button: Button, now_ms: u32) {
        self.levels[button.slot()].store(true, Ordering::Relaxed);
        self.presses[button.slot()].store(PRESS_PENDING | u64::from(now_ms), Ordering::Release);
    }

    /// Level change of a button as seen by its edge handler (ISR).
    #[inline]
    pub fn record_level(&self, button: Button, pressed: bool) {
        self.levels[button.slot()].store(pressed, Ordering::Relaxed);
    }

    /// Raw pulse counter.
    #[inline]
    pub fn pulses(&self) -> i32 {
        self.pulses.load(Ordering::Acquire)
    }

    /// Packed press word for `button`.
    #[inline]
    pub(crate) fn press_word(&self, button: Button) -> u64 {
        self.presses[button.slot()].load(Ordering::Acquire)
    }

    /// Clear the press word only if the ISR has not replaced it since it
    /// was read. Returns false when a newer press arrived.
    #[inline]
    pub(crate) fn consume_press(&self, button: Button, observed: u64) -> bool {
        self.presses[button.slot()]
            .compare_exchange(observed, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Drop every pending press (used when input is disabled).
    pub fn clear_presses(&self) {
        for word in &self.presses {
            word.store(0, Ordering::Release);
        }
    }
}

/// Re-samples the physical button levels when a press is resolved.
pub trait ButtonLevels {
    fn is_pressed(&mut self, button: Button) -> bool;
}

/// Levels as last reported by the edge handlers.
impl ButtonLevels for &InputCapture {
    fn is_pressed(&mut self, button: Button) -> bool {
        self.levels[button.slot()].load(Ordering::Relaxed)
    }
}

/// Active-low buttons read directly through `embedded-hal` pins.
///
/// A pin read error counts as "not pressed", so a flaky read turns a
/// press into discarded noise rather than a phantom click.
pub struct PinLevels<CONFIRM, BACK, ENC> {
    confirm: CONFIRM,
    back: BACK,
    encoder: Option<ENC>,
}

impl<CONFIRM, BACK, ENC> PinLevels<CONFIRM, BACK, ENC>
where
    CONFIRM: InputPin,
    BACK: InputPin,
    ENC: InputPin,
{
    pub fn new(confirm: CONFIRM, back: BACK, encoder: Option<ENC>) -> Self {
        Self {
            confirm,
            back,
            encoder,
        }
    }
}

impl<CONFIRM, BACK, ENC> ButtonLevels for PinLevels<CONFIRM, BACK, ENC>
where
    CONFIRM: InputPin,
    BACK: InputPin,
    ENC: InputPin,
{
    fn is_pressed(&mut self, button: Button) -> bool {
        match button {
            Button::Confirm => self.confirm.is_low().unwrap_or(false),
            Button::Back => self.back.is_low().unwrap_or(false),
            Button::Encoder => self
                .encoder
                .as_mut()
                .map(|pin| pin.is_low().unwrap_or(false))
                .unwrap_or(false),
        }
    }
}
