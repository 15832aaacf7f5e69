//! Pagination cursors shared by the list and grid loops.
//!
//! A cursor never owns the items it walks. It only knows how many there
//! are and how many fit on screen, and keeps the selected ordinal split
//! into a scroll `offset` (first visible item) and an `index` within the
//! visible page, so that `offset + index` is always the selection.

use std::ops::Range;

/// Cursor over a vertical list showing `capacity` rows at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCursor {
    index: usize,
    offset: usize,
    capacity: usize,
    len: usize,
}

impl ListCursor {
    /// Cursor on the first item.
    pub fn new(capacity: usize, len: usize) -> Self {
        Self {
            index: 0,
            offset: 0,
            capacity: capacity.max(1),
            len,
        }
    }

    /// Cursor on `selected`, laid out as if the user had walked there from
    /// the top one row at a time. Out of range selections are clamped to
    /// the last item.
    pub fn place(capacity: usize, len: usize, selected: usize) -> Self {
        let mut cursor = Self::new(capacity, len);
        let target = selected.min(len.saturating_sub(1));
        while cursor.selected() < target {
            cursor.advance();
        }
        cursor
    }

    /// Rows shown per page.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Row of the selection inside the visible page.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of items scrolled past; also the ordinal of the top row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Ordinal of the selected item. Meaningless when the list is empty.
    pub fn selected(&self) -> usize {
        self.offset + self.index
    }

    /// Ordinal of the selected item, `None` for an empty list.
    pub fn current(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.selected())
    }

    /// Ordinals drawn this frame.
    pub fn visible(&self) -> Range<usize> {
        self.offset..(self.offset + self.capacity).min(self.len)
    }

    fn advance(&mut self) {
        if self.index + 1 >= self.capacity {
            self.offset += 1;
        } else {
            self.index += 1;
        }
    }

    fn retreat(&mut self) {
        if self.index == 0 {
            self.offset -= 1;
        } else {
            self.index -= 1;
        }
    }

    /// Move down one item. Returns false at the end of the list.
    pub fn step_next(&mut self) -> bool {
        if self.selected() + 1 >= self.len {
            return false;
        }
        self.advance();
        true
    }

    /// Move up one item. Returns false at the top of the list.
    pub fn step_prev(&mut self) -> bool {
        if self.selected() == 0 || self.is_empty() {
            return false;
        }
        self.retreat();
        true
    }

    /// Move down by half a page, stopping at the last item.
    pub fn page_next(&mut self) -> bool {
        let mut moved = false;
        for _ in 0..self.capacity / 2 {
            if !self.step_next() {
                break;
            }
            moved = true;
        }
        moved
    }

    /// Move up by half a page, stopping at the first item.
    pub fn page_prev(&mut self) -> bool {
        let mut moved = false;
        for _ in 0..self.capacity / 2 {
            if !self.step_prev() {
                break;
            }
            moved = true;
        }
        moved
    }

    /// Move down to the next item accepted by `selectable`.
    ///
    /// When no such item exists below the selection the cursor is left
    /// exactly where it was.
    pub fn next_selectable(&mut self, selectable: impl Fn(usize) -> bool) -> bool {
        let saved = *self;
        while self.step_next() {
            if selectable(self.selected()) {
                return true;
            }
        }
        *self = saved;
        false
    }

    /// Move up to the previous item accepted by `selectable`.
    pub fn prev_selectable(&mut self, selectable: impl Fn(usize) -> bool) -> bool {
        let saved = *self;
        while self.step_prev() {
            if selectable(self.selected()) {
                return true;
            }
        }
        *self = saved;
        false
    }
}

/// Cursor over a grid of `per_row` columns that scrolls a whole screen of
/// `per_screen` cells at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    index: usize,
    offset: usize,
    per_row: usize,
    per_screen: usize,
    len: usize,
}

impl GridCursor {
    pub fn new(per_row: usize, per_screen: usize, len: usize) -> Self {
        let per_row = per_row.max(1);
        Self {
            index: 0,
            offset: 0,
            per_row,
            per_screen: per_screen.max(per_row),
            len,
        }
    }

    /// Cursor on `selected`, clamped to the last cell.
    pub fn place(per_row: usize, per_screen: usize, len: usize, selected: usize) -> Self {
        let mut cursor = Self::new(per_row, per_screen, len);
        let target = selected.min(len.saturating_sub(1));
        cursor.offset = target / cursor.per_screen * cursor.per_screen;
        cursor.index = target - cursor.offset;
        cursor
    }

    pub fn per_row(&self) -> usize {
        self.per_row
    }

    pub fn per_screen(&self) -> usize {
        self.per_screen
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell of the selection on the current screen.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Ordinal of the first cell on the current screen.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn selected(&self) -> usize {
        self.offset + self.index
    }

    pub fn current(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.selected())
    }

    pub fn visible(&self) -> Range<usize> {
        self.offset..(self.offset + self.per_screen).min(self.len)
    }

    /// One cell right, wrapping onto the next row and screen.
    pub fn next(&mut self) -> bool {
        if self.selected() + 1 >= self.len {
            return false;
        }
        self.index += 1;
        if self.index >= self.per_screen {
            self.index = 0;
            self.offset += self.per_screen;
        }
        true
    }

    /// One cell left, wrapping onto the previous row and screen.
    pub fn prev(&mut self) -> bool {
        if self.selected() == 0 || self.is_empty() {
            return false;
        }
        if self.index == 0 {
            self.index = self.per_screen - 1;
            self.offset -= self.per_screen;
        } else {
            self.index -= 1;
        }
        true
    }

    /// One row down, or as far as the list goes.
    pub fn down(&mut self) -> bool {
        let mut moved = false;
        for _ in 0..self.per_row {
            if !self.next() {
                break;
            }
            moved = true;
        }
        moved
    }

    /// One row up, or as far as the list goes.
    pub fn up(&mut self) -> bool {
        let mut moved = false;
        for _ in 0..self.per_row {
            if !self.prev() {
                break;
            }
            moved = true;
        }
        moved
    }
}
