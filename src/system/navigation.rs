//! Selection and scroll arithmetic for the menu list.

use crate::menu::NodeId;

/// Which menu is listed and where the cursor sits in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub menu: Option<NodeId>,
    pub selected: usize,
    pub scroll: usize,
    pub visible: usize,
}

impl Navigation {
    pub fn new(visible: usize) -> Self {
        Self {
            menu: None,
            selected: 0,
            scroll: 0,
            visible: visible.max(1),
        }
    }

    /// List `menu` from the top.
    pub fn open(&mut self, menu: NodeId) {
        self.menu = Some(menu);
        self.selected = 0;
        self.scroll = 0;
    }

    /// Move the cursor by `delta` rows in a list of `count` items.
    pub fn step(&mut self, delta: i32, count: usize, wrap: bool) {
        self.selected = step_selection(self.selected, delta, count, wrap);
        self.scroll = scroll_window(self.selected, self.scroll, count, self.visible);
    }

    /// Put the cursor on `index`, clamped to the list.
    pub fn select(&mut self, index: usize, count: usize) {
        self.selected = index.min(count.saturating_sub(1));
        self.scroll = scroll_window(self.selected, self.scroll, count, self.visible);
    }
}

/// New selection after rotating by `delta`. Clamps to the list unless
/// `wrap` is set, in which case it cycles.
pub fn step_selection(selected: usize, delta: i32, count: usize, wrap: bool) -> usize {
    if count == 0 {
        return 0;
    }
    let target = selected as i64 + i64::from(delta);
    if wrap {
        target.rem_euclid(count as i64) as usize
    } else {
        target.clamp(0, count as i64 - 1) as usize
    }
}

/// Scroll offset that keeps `selected` on screen, moving as little as
/// possible and never scrolling past the last page.
pub fn scroll_window(selected: usize, scroll: usize, count: usize, visible: usize) -> usize {
    let visible = visible.max(1);
    if count <= visible {
        return 0;
    }
    let scroll = if selected < scroll {
        selected
    } else if selected >= scroll + visible {
        selected + 1 - visible
    } else {
        scroll
    };
    scroll.min(count - visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_without_wraparound() {
        assert_eq!(step_selection(0, -1, 5, false), 0);
        assert_eq!(step_selection(4, 1, 5, false), 4);
        assert_eq!(step_selection(2, 100, 5, false), 4);
    }

    #[test]
    fn repeated_rotation_stops_at_last_item() {
        for count in 1..10 {
            let mut selected = 0;
            for _ in 0..count + 5 {
                selected = step_selection(selected, 1, count, false);
            }
            assert_eq!(selected, count - 1);
        }
    }

    #[test]
    fn wraparound_cycles() {
        assert_eq!(step_selection(4, 1, 5, true), 0);
        assert_eq!(step_selection(0, -1, 5, true), 4);
        assert_eq!(step_selection(1, -12, 5, true), 4);
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert_eq!(step_selection(3, 1, 0, false), 0);
        assert_eq!(step_selection(3, 1, 0, true), 0);
    }

    #[test]
    fn scroll_follows_selection_both_ways() {
        // 10 items, 4 visible
        assert_eq!(scroll_window(3, 0, 10, 4), 0);
        assert_eq!(scroll_window(4, 0, 10, 4), 1);
        assert_eq!(scroll_window(9, 1, 10, 4), 6);
        assert_eq!(scroll_window(5, 6, 10, 4), 5);
    }

    #[test]
    fn short_lists_never_scroll() {
        assert_eq!(scroll_window(2, 5, 3, 4), 0);
    }

    #[test]
    fn scroll_never_passes_last_page() {
        assert_eq!(scroll_window(7, 9, 10, 4), 6);
    }

    #[test]
    fn navigation_keeps_selection_visible() {
        let mut nav = Navigation::new(4);
        for _ in 0..7 {
            nav.step(1, 10, false);
        }
        assert_eq!(nav.selected, 7);
        assert!(nav.selected >= nav.scroll && nav.selected < nav.scroll + nav.visible);
        nav.select(20, 3);
        assert_eq!((nav.selected, nav.scroll), (2, 0));
    }
}
