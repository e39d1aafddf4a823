use crate::model::{Entry, SearchResult};

/// Highlighted row over the current result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<usize>,
    len: usize,
}

impl Selection {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Must run after every recomputation of the result list.
    pub fn on_results_changed(&mut self, new_len: usize) {
        self.len = new_len;
        self.selected = match self.selected {
            _ if new_len == 0 => None,
            Some(index) if index < new_len => Some(index),
            _ => Some(0),
        };
    }

    pub fn reset(&mut self) {
        self.selected = (self.len > 0).then_some(0);
    }

    pub fn move_down(&mut self) -> bool {
        match self.selected {
            Some(index) if index + 1 < self.len => {
                self.selected = Some(index + 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_up(&mut self) -> bool {
        match self.selected {
            Some(index) if index >= 1 => {
                self.selected = Some(index - 1);
                true
            }
            _ => false,
        }
    }

    /// Pointer selection. Callers only pass rows they rendered, so an
    /// out-of-range index is ignored.
    pub fn set_selected(&mut self, index: usize) -> bool {
        if index >= self.len {
            tracing::warn!(index, len = self.len, "ignoring out-of-range selection");
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn activate<'a>(&self, results: &'a [SearchResult]) -> Option<&'a Entry> {
        self.selected
            .and_then(|index| results.get(index))
            .map(|result| &result.entry)
    }
}

/// Scroll window over the result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    visible_rows: usize,
    scroll_top: usize,
}

impl Viewport {
    pub fn new(visible_rows: usize) -> Self {
        Self {
            visible_rows: visible_rows.max(1),
            scroll_top: 0,
        }
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.scroll_top && index < self.scroll_top + self.visible_rows
    }

    /// Scrolls the least amount that brings `index` into view.
    pub fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_top {
            self.scroll_top = index;
        } else if index >= self.scroll_top + self.visible_rows {
            self.scroll_top = index + 1 - self.visible_rows;
        }
    }

    pub fn clamp(&mut self, len: usize) {
        let max_top = len.saturating_sub(self.visible_rows);
        self.scroll_top = self.scroll_top.min(max_top);
    }

    pub fn reset(&mut self) {
        self.scroll_top = 0;
    }
}
