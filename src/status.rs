//! Application-supplied status shown on the idle screen.

use core::cell::{Cell, RefCell};

use crate::config::ADDRESS_LEN;
use crate::menu::truncated;

pub type Address = heapless::String<ADDRESS_LEN>;

/// Connectivity flag and address, updated in place by the application
/// while the menu system holds a shared reference to it.
#[derive(Debug, Default)]
pub struct StatusSnapshot {
    connected: Cell<bool>,
    address: RefCell<Address>,
}

impl StatusSnapshot {
    pub const fn new() -> Self {
        Self {
            connected: Cell::new(false),
            address: RefCell::new(Address::new()),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.set(connected);
    }

    pub fn connected(&self) -> bool {
        self.connected.get()
    }

    /// Longer addresses are truncated. Skipped if the address is being
    /// read at the same moment.
    pub fn set_address(&self, address: &str) {
        if let Ok(mut slot) = self.address.try_borrow_mut() {
            *slot = truncated(address);
        }
    }

    pub fn address(&self) -> Address {
        self.address
            .try_borrow()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}
