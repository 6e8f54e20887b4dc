//! Editing sessions.
//!
//! A session snapshots the bound value when editing starts, edits the copy,
//! and writes it back only on commit. Abandoning a session is just dropping
//! it.

use crate::menu::{
    truncated, ChoiceItem, Label, NodeId, NodeKind, NumericItem, TextBuffer, TextItem,
};
use crate::render::{ChoiceView, NumericView, TextView};

use super::Mode;

pub(crate) enum Edit<'a> {
    Numeric {
        item: NumericItem<'a>,
        value: i32,
    },
    Text {
        item: TextItem<'a>,
        buffer: TextBuffer,
        palette_index: usize,
    },
    Choice {
        item: ChoiceItem<'a>,
        value: bool,
    },
}

/// What an encoder click did in string entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Append {
    Added,
    Full,
}

pub(crate) struct Session<'a> {
    /// Node the session edits; `None` for overlay edits started directly.
    pub origin: Option<NodeId>,
    pub title: Label,
    /// Mode to go back to when the session ends.
    pub return_to: Mode,
    pub edit: Edit<'a>,
}

impl<'a> Session<'a> {
    /// Snapshot the bound value of an editable node. Returns `None` for
    /// kinds that don't edit.
    pub fn start(
        origin: Option<NodeId>,
        title: &str,
        kind: &NodeKind<'a>,
        return_to: Mode,
    ) -> Option<Self> {
        let edit = match *kind {
            NodeKind::Numeric(item) => Edit::Numeric {
                item,
                value: item.slot.get().clamp(item.min, item.max),
            },
            NodeKind::Text(item) => {
                let limit = item.max_len.saturating_sub(1);
                let mut buffer = TextBuffer::new();
                if let Ok(current) = item.slot.try_borrow() {
                    for ch in current.chars().take(limit) {
                        if buffer.push(ch).is_err() {
                            break;
                        }
                    }
                }
                Edit::Text {
                    item,
                    buffer,
                    palette_index: 0,
                }
            }
            NodeKind::EitherOr(item) => Edit::Choice {
                item,
                value: item.slot.get(),
            },
            _ => return None,
        };
        Some(Self {
            origin,
            title: truncated(title),
            return_to,
            edit,
        })
    }

    pub fn mode(&self) -> Mode {
        match self.edit {
            Edit::Numeric { .. } => Mode::NumericEntry,
            Edit::Text { .. } => Mode::StringEntry,
            Edit::Choice { .. } => Mode::EitherOrEntry,
        }
    }

    pub fn rotate(&mut self, delta: i32) {
        match &mut self.edit {
            Edit::Numeric { item, value } => {
                let next = i64::from(*value) + i64::from(delta) * i64::from(item.step);
                *value = next.clamp(i64::from(item.min), i64::from(item.max)) as i32;
            }
            Edit::Text {
                item,
                palette_index,
                ..
            } => {
                let len = item.palette.chars().count().max(1) as i64;
                let index = *palette_index as i64 + i64::from(delta);
                *palette_index = index.rem_euclid(len) as usize;
            }
            // Any movement flips the choice, whichever way the knob turned.
            Edit::Choice { value, .. } => {
                if delta != 0 {
                    *value = !*value;
                }
            }
        }
    }

    /// Append the selected palette character, or report that the buffer
    /// is already at its limit.
    pub fn append(&mut self) -> Append {
        let Edit::Text {
            item,
            buffer,
            palette_index,
        } = &mut self.edit
        else {
            return Append::Full;
        };
        let limit = item.max_len.saturating_sub(1);
        if buffer.chars().count() >= limit {
            return Append::Full;
        }
        let Some(ch) = item.palette.chars().nth(*palette_index) else {
            return Append::Full;
        };
        if buffer.push(ch).is_err() {
            return Append::Full;
        }
        *palette_index = 0;
        Append::Added
    }

    /// Drop the last character. Returns false if the buffer was empty.
    pub fn backspace(&mut self) -> bool {
        match &mut self.edit {
            Edit::Text { buffer, .. } => buffer.pop().is_some(),
            _ => false,
        }
    }

    /// Write the edited value back and run the on-save hook.
    pub fn commit(self) {
        let hook = match self.edit {
            Edit::Numeric { item, value } => {
                item.slot.set(value);
                item.on_save
            }
            Edit::Text { item, buffer, .. } => {
                match item.slot.try_borrow_mut() {
                    Ok(mut slot) => *slot = buffer,
                    Err(_) => {
                        warn!("string slot busy, edit dropped");
                        return;
                    }
                }
                item.on_save
            }
            Edit::Choice { item, value } => {
                item.slot.set(value);
                item.on_save
            }
        };
        if let Some(hook) = hook {
            hook();
        }
    }

    pub fn numeric_view(&self) -> Option<NumericView<'_>> {
        match &self.edit {
            Edit::Numeric { item, value } => Some(NumericView {
                title: &self.title,
                value: *value,
                min: item.min,
                max: item.max,
                unit: item.unit,
            }),
            _ => None,
        }
    }

    pub fn text_view(&self) -> Option<TextView<'_>> {
        match &self.edit {
            Edit::Text {
                item,
                buffer,
                palette_index,
            } => {
                let len = item.palette.chars().count().max(1);
                let at = |i: usize| item.palette.chars().nth(i % len).unwrap_or(' ');
                Some(TextView {
                    title: &self.title,
                    buffer,
                    current: at(*palette_index),
                    previous: at(*palette_index + len - 1),
                    next: at(*palette_index + 1),
                })
            }
            _ => None,
        }
    }

    pub fn choice_view(&self) -> Option<ChoiceView<'_>> {
        match &self.edit {
            Edit::Choice { item, value } => Some(ChoiceView {
                title: &self.title,
                first: item.first,
                second: item.second,
                value: *value,
            }),
            _ => None,
        }
    }
}
