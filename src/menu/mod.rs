//! Menu data model.
//!
//! Nodes live in the [`tree::MenuTree`] arena and are addressed by
//! [`NodeId`] handles. Each node carries a label and a [`NodeKind`]
//! payload; editable kinds bind to application-owned slots through shared
//! references with interior mutability, so the application keeps reading
//! and writing its own values while the menu holds them.

pub mod tree;

use core::cell::{Cell, RefCell};

use crate::config::{DEFAULT_PALETTE, LABEL_LEN, TEXT_CAPACITY};

/// Fixed-capacity node label.
pub type Label = heapless::String<LABEL_LEN>;

/// Backing store for string items.
pub type TextBuffer = heapless::String<TEXT_CAPACITY>;

/// Invoked when an action is activated or an edit is committed.
pub type ActionHook<'a> = &'a dyn Fn();

/// Copy `text` into a fixed-capacity string, dropping whatever doesn't fit.
/// Truncation happens on a char boundary.
pub fn truncated<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Stable handle to an arena node. A handle outlives its node only as a
/// detectably stale value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId {
    pub(crate) index: u16,
    pub(crate) generation: u16,
}

/// Numeric value bound to a `Cell<i32>`.
#[derive(Clone, Copy)]
pub struct NumericItem<'a> {
    pub(crate) slot: &'a Cell<i32>,
    pub(crate) min: i32,
    pub(crate) max: i32,
    pub(crate) step: i32,
    pub(crate) unit: &'a str,
    pub(crate) on_save: Option<ActionHook<'a>>,
}

impl<'a> NumericItem<'a> {
    /// Bounds given in the wrong order are swapped.
    pub fn new(slot: &'a Cell<i32>, min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            slot,
            min,
            max,
            step: 1,
            unit: "",
            on_save: None,
        }
    }

    /// Non-positive steps fall back to 1.
    pub fn step(mut self, step: i32) -> Self {
        self.step = if step > 0 { step } else { 1 };
        self
    }

    pub fn unit(mut self, unit: &'a str) -> Self {
        self.unit = unit;
        self
    }

    pub fn on_save(mut self, hook: ActionHook<'a>) -> Self {
        self.on_save = Some(hook);
        self
    }

    pub fn range(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    pub fn step_size(&self) -> i32 {
        self.step
    }
}

/// Free text bound to a `RefCell<TextBuffer>`.
#[derive(Clone, Copy)]
pub struct TextItem<'a> {
    pub(crate) slot: &'a RefCell<TextBuffer>,
    pub(crate) max_len: usize,
    pub(crate) palette: &'a str,
    pub(crate) on_save: Option<ActionHook<'a>>,
}

impl<'a> TextItem<'a> {
    /// `max_len` counts the terminator slot, so at most `max_len - 1`
    /// characters are entered. It is capped at the buffer capacity.
    pub fn new(slot: &'a RefCell<TextBuffer>, max_len: usize) -> Self {
        Self {
            slot,
            max_len: max_len.min(TEXT_CAPACITY),
            palette: DEFAULT_PALETTE,
            on_save: None,
        }
    }

    /// An empty palette keeps the default one.
    pub fn palette(mut self, palette: &'a str) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    pub fn on_save(mut self, hook: ActionHook<'a>) -> Self {
        self.on_save = Some(hook);
        self
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

/// Binary choice bound to a `Cell<bool>`. The first option stands for
/// `true`.
#[derive(Clone, Copy)]
pub struct ChoiceItem<'a> {
    pub(crate) slot: &'a Cell<bool>,
    pub(crate) first: &'a str,
    pub(crate) second: &'a str,
    pub(crate) on_save: Option<ActionHook<'a>>,
}

impl<'a> ChoiceItem<'a> {
    pub fn new(slot: &'a Cell<bool>) -> Self {
        Self {
            slot,
            first: "On",
            second: "Off",
            on_save: None,
        }
    }

    pub fn options(mut self, first: &'a str, second: &'a str) -> Self {
        self.first = first;
        self.second = second;
        self
    }

    pub fn on_save(mut self, hook: ActionHook<'a>) -> Self {
        self.on_save = Some(hook);
        self
    }
}

/// Node payload.
#[derive(Clone, Copy)]
pub enum NodeKind<'a> {
    Submenu,
    Action { hook: Option<ActionHook<'a>> },
    Numeric(NumericItem<'a>),
    Text(TextItem<'a>),
    EitherOr(ChoiceItem<'a>),
    Info,
}

impl NodeKind<'_> {
    pub fn is_submenu(&self) -> bool {
        matches!(self, NodeKind::Submenu)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Submenu => "submenu",
            NodeKind::Action { .. } => "action",
            NodeKind::Numeric(_) => "numeric",
            NodeKind::Text(_) => "string",
            NodeKind::EitherOr(_) => "either-or",
            NodeKind::Info => "info",
        }
    }
}

/// One arena entry. Links are maintained by the tree.
pub struct MenuNode<'a> {
    pub(crate) label: Label,
    pub(crate) kind: NodeKind<'a>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
}

impl<'a> MenuNode<'a> {
    pub(crate) fn new(label: &str, kind: NodeKind<'a>) -> Self {
        Self {
            label: truncated(label),
            kind,
            parent: None,
            first_child: None,
            next_sibling: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &NodeKind<'a> {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}
