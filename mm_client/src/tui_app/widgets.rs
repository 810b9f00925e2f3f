use ratatui::widgets::{ListItem, ListState, ScrollbarState};
use std::collections::VecDeque;

/// A bounded, scrollable list of rendered lines. Newest items are kept at
/// the front so the list can be drawn bottom-to-top.
pub struct ScrollableList {
    max_items: usize,
    pub list_items: VecDeque<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            list_items: VecDeque::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
        }
    }

    pub fn push(&mut self, item: ListItem<'static>) {
        self.list_items.push_front(item);
        self.list_items.truncate(self.max_items);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
        self.jump_to_last();
    }

    pub fn len(&self) -> usize {
        self.list_items.len()
    }

    /// Oldest item.
    pub fn jump_to_first(&mut self) {
        let last = self.list_items.len().saturating_sub(1);
        self.select(last);
    }

    /// Newest item.
    pub fn jump_to_last(&mut self) {
        self.select(0);
    }

    pub fn move_up(&mut self) {
        let idx = self.list_state.selected().unwrap_or(0);
        let last = self.list_items.len().saturating_sub(1);
        self.select((idx + 1).min(last));
    }

    pub fn move_down(&mut self) {
        let idx = self.list_state.selected().unwrap_or(0);
        self.select(idx.saturating_sub(1));
    }

    fn select(&mut self, idx: usize) {
        self.list_state.select(Some(idx));
        let last = self.list_items.len().saturating_sub(1);
        self.scroll_state = self.scroll_state.position(last.saturating_sub(idx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize, max: usize) -> ScrollableList {
        let mut list = ScrollableList::new(max);
        for i in 0..n {
            list.push(ListItem::new(format!("line {i}")));
        }
        list
    }

    #[test]
    fn test_push_is_bounded() {
        let list = filled(10, 4);
        assert_eq!(list.len(), 4);
        assert_eq!(list.list_state.selected(), Some(0));
    }

    #[test]
    fn test_scrolling_clamps() {
        let mut list = filled(3, 10);
        list.move_down();
        assert_eq!(list.list_state.selected(), Some(0));

        for _ in 0..5 {
            list.move_up();
        }
        assert_eq!(list.list_state.selected(), Some(2));

        list.jump_to_last();
        assert_eq!(list.list_state.selected(), Some(0));
        list.jump_to_first();
        assert_eq!(list.list_state.selected(), Some(2));
    }
}
