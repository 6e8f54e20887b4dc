//! Unified error type for the menu system.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for
//! efficient on-target logging.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Initialisation
    /// The display surface failed to initialise.
    Display,

    /// Two inputs were assigned the same pin.
    PinConflict(u8),

    // Menu tree
    /// The node arena has no free slot left.
    TreeFull,

    /// The handle refers to a node that has been released.
    StaleNode,

    /// The operation needs a submenu node.
    NotASubmenu,

    /// The menu already has a parent (or is the root menu).
    AlreadyAttached,

    /// Attaching the menu here would make the tree cyclic.
    WouldCycle,
}
