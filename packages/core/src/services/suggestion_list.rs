//! Rendered suggestion list and its navigation cursor.
//!
//! States are "no active item" and "item K active". The list is rebuilt on
//! every applied query response, which always resets the cursor.

use crate::models::SuggestionItem;

/// Cursor movement requested by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    /// Down / Tab
    Next,
    /// Up
    Previous,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionList {
    items: Vec<SuggestionItem>,
    active: Option<usize>,
}

impl SuggestionList {
    /// Build a list in server order, optionally highlighting the first item.
    pub fn new(items: Vec<SuggestionItem>, activate_first: bool) -> Self {
        let active = if activate_first && !items.is_empty() {
            Some(0)
        } else {
            None
        };
        Self { items, active }
    }

    pub fn items(&self) -> &[SuggestionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SuggestionItem> {
        self.items.get(index)
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_item(&self) -> Option<&SuggestionItem> {
        self.active.and_then(|index| self.items.get(index))
    }

    /// Move the cursor, wrapping at both ends. From "no active item" either
    /// direction lands on the first item. No-op on an empty list.
    pub fn move_cursor(&mut self, direction: CursorMove) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }

        let next = match (self.active, direction) {
            (None, _) => 0,
            (Some(k), CursorMove::Next) => (k + 1) % len,
            (Some(0), CursorMove::Previous) => len - 1,
            (Some(k), CursorMove::Previous) => k - 1,
        };
        self.active = Some(next);
        self.active
    }
}
