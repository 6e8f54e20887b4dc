//! rotary-menu: an OLED menu system driven by a rotary encoder and two
//! push-buttons.
//!
//! The library is `no_std` and hardware-agnostic. Interrupt handlers feed
//! [`input::InputCapture`]; the main loop owns a [`MenuSystem`] and calls
//! [`MenuSystem::update`] once per iteration. Everything above the board
//! glue builds and is tested on the host.
//!
//! Usage: `cargo test` for the host suite,
//! `cargo run --release --features embedded --target thumbv7em-none-eabihf`
//! for the nRF52840 demo.
//!
//! ## Components
//!
//! - **Input capture**: ISR-shared atomics, quadrature decoding, press
//!   debounce and click / long-press classification
//! - **Menu tree**: arena of nodes addressed by generation-checked handles
//! - **Mode controller**: status screen, menu navigation, numeric / string /
//!   either-or editors, flash messages, screen saver and menu timeout
//! - **Renderer**: per-mode layouts over an abstract [`render::Surface`]

#![cfg_attr(not(test), no_std)]

// Must come first so the log macros are visible to every module below.
mod fmt;

pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod menu;
pub mod power_logic;
pub mod render;
pub mod status;
pub mod system;

#[cfg(feature = "embedded")]
pub mod board;

pub use clock::{Clock, ManualClock};
pub use config::{Geometry, MenuConfig, PinConfig};
pub use error::Error;
pub use input::{Button, ButtonEvent, ButtonLevels, InputCapture, INPUT};
pub use menu::tree::MenuTree;
pub use menu::{ActionHook, ChoiceItem, NodeId, NodeKind, NumericItem, TextBuffer, TextItem};
pub use render::Surface;
pub use status::StatusSnapshot;
pub use system::{MenuSystem, Mode};
