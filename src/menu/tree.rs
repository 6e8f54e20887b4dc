//! Arena-backed menu tree.
//!
//! Nodes are stored in a fixed array of slots and linked parent /
//! first-child / next-sibling. Sibling order is insertion order and is the
//! display order. Releasing a node bumps its slot's generation, so handles
//! to it stop resolving instead of aliasing whatever reuses the slot.

use heapless::Vec;

use super::{ActionHook, ChoiceItem, MenuNode, NodeId, NodeKind, NumericItem, TextItem};
use crate::config::MAX_MENU_NODES;
use crate::error::Error;

struct Slot<'a> {
    generation: u16,
    node: Option<MenuNode<'a>>,
}

pub struct MenuTree<'a> {
    slots: Vec<Slot<'a>, MAX_MENU_NODES>,
    root: Option<NodeId>,
    live: usize,
}

impl Default for MenuTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MenuTree<'a> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            root: None,
            live: 0,
        }
    }

    // ── Lookup ──────────────────────────────────────────────────────────

    pub fn get(&self, id: NodeId) -> Option<&MenuNode<'a>> {
        self.slots
            .get(usize::from(id.index))
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut MenuNode<'a>> {
        self.slots
            .get_mut(usize::from(id.index))
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Live node count.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root.filter(|&id| self.contains(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, menu: NodeId) -> Children<'_, 'a> {
        Children {
            tree: self,
            next: self.get(menu).and_then(|node| node.first_child),
        }
    }

    pub fn child_count(&self, menu: NodeId) -> usize {
        self.children(menu).count()
    }

    /// Child at 0-based display position.
    pub fn child_at(&self, menu: NodeId, index: usize) -> Option<NodeId> {
        self.children(menu).nth(index)
    }

    /// Display position of `child` among its siblings.
    pub fn index_of(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).position(|id| id == child)
    }

    fn is_submenu(&self, id: NodeId) -> Result<(), Error> {
        let node = self.get(id).ok_or(Error::StaleNode)?;
        if node.kind.is_submenu() {
            Ok(())
        } else {
            Err(Error::NotASubmenu)
        }
    }

    // ── Building ────────────────────────────────────────────────────────

    fn alloc(&mut self, node: MenuNode<'a>) -> Result<NodeId, Error> {
        let free = self.slots.iter().position(|slot| slot.node.is_none());
        let index = match free {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots
                    .push(Slot {
                        generation: 0,
                        node: Some(node),
                    })
                    .map_err(|_| {
                        warn!("menu tree full ({} nodes)", MAX_MENU_NODES);
                        Error::TreeFull
                    })?;
                self.slots.len() - 1
            }
        };
        self.live += 1;
        Ok(NodeId {
            index: index as u16,
            generation: self.slots[index].generation,
        })
    }

    /// Link `child` as the last child of `parent`.
    fn append(&mut self, parent: NodeId, child: NodeId) {
        let mut tail = match self.get(parent).and_then(|node| node.first_child) {
            Some(first) => first,
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = Some(child);
                }
                return;
            }
        };
        while let Some(next) = self.get(tail).and_then(|node| node.next_sibling) {
            tail = next;
        }
        if let Some(node) = self.get_mut(tail) {
            node.next_sibling = Some(child);
        }
    }

    fn add(&mut self, parent: NodeId, label: &str, kind: NodeKind<'a>) -> Result<NodeId, Error> {
        self.is_submenu(parent)?;
        let mut node = MenuNode::new(label, kind);
        node.parent = Some(parent);
        let id = self.alloc(node)?;
        self.append(parent, id);
        Ok(id)
    }

    /// A detached submenu, to become the root or be attached later.
    pub fn create_menu(&mut self, title: &str) -> Result<NodeId, Error> {
        self.alloc(MenuNode::new(title, NodeKind::Submenu))
    }

    pub fn set_root(&mut self, menu: NodeId) -> Result<(), Error> {
        self.is_submenu(menu)?;
        if self.parent(menu).is_some() {
            return Err(Error::AlreadyAttached);
        }
        self.root = Some(menu);
        Ok(())
    }

    pub fn add_submenu(&mut self, parent: NodeId, label: &str) -> Result<NodeId, Error> {
        self.add(parent, label, NodeKind::Submenu)
    }

    /// Link a detached menu from `create_menu` under `parent`, giving it
    /// `label` as its row text.
    pub fn attach_submenu(
        &mut self,
        parent: NodeId,
        label: &str,
        menu: NodeId,
    ) -> Result<NodeId, Error> {
        self.is_submenu(parent)?;
        self.is_submenu(menu)?;
        if self.parent(menu).is_some() || self.root() == Some(menu) {
            return Err(Error::AlreadyAttached);
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == menu {
                return Err(Error::WouldCycle);
            }
            cursor = self.parent(id);
        }
        if let Some(node) = self.get_mut(menu) {
            node.label = super::truncated(label);
            node.parent = Some(parent);
            node.next_sibling = None;
        }
        self.append(parent, menu);
        Ok(menu)
    }

    pub fn add_action(
        &mut self,
        parent: NodeId,
        label: &str,
        hook: Option<ActionHook<'a>>,
    ) -> Result<NodeId, Error> {
        self.add(parent, label, NodeKind::Action { hook })
    }

    pub fn add_numeric(
        &mut self,
        parent: NodeId,
        label: &str,
        item: NumericItem<'a>,
    ) -> Result<NodeId, Error> {
        self.add(parent, label, NodeKind::Numeric(item))
    }

    pub fn add_string(
        &mut self,
        parent: NodeId,
        label: &str,
        item: TextItem<'a>,
    ) -> Result<NodeId, Error> {
        self.add(parent, label, NodeKind::Text(item))
    }

    pub fn add_either_or(
        &mut self,
        parent: NodeId,
        label: &str,
        item: ChoiceItem<'a>,
    ) -> Result<NodeId, Error> {
        self.add(parent, label, NodeKind::EitherOr(item))
    }

    pub fn add_info(&mut self, parent: NodeId, label: &str) -> Result<NodeId, Error> {
        self.add(parent, label, NodeKind::Info)
    }

    // ── Release ─────────────────────────────────────────────────────────

    /// Release every descendant of `node`, keeping `node` itself. Returns
    /// how many nodes were released.
    pub fn clear_children(&mut self, node: NodeId) -> Result<usize, Error> {
        let first = self.get(node).ok_or(Error::StaleNode)?.first_child;
        if let Some(parent) = self.get_mut(node) {
            parent.first_child = None;
        }

        let mut pending: Vec<NodeId, MAX_MENU_NODES> = Vec::new();
        if let Some(first) = first {
            let _ = pending.push(first);
        }
        let mut released = 0;
        while let Some(id) = pending.pop() {
            let Some(slot) = self.slots.get_mut(usize::from(id.index)) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            let Some(gone) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.live -= 1;
            released += 1;
            // Every live node sits on exactly one pending path, so the
            // stack never holds more than the arena does.
            if let Some(next) = gone.next_sibling {
                let _ = pending.push(next);
            }
            if let Some(child) = gone.first_child {
                let _ = pending.push(child);
            }
        }
        debug!("released {} menu nodes", released);
        Ok(released)
    }
}

/// Iterator over a menu's children in display order.
pub struct Children<'t, 'a> {
    tree: &'t MenuTree<'a>,
    next: Option<NodeId>,
}

impl Iterator for Children<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|node| node.next_sibling);
        Some(current)
    }
}
