use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// "Load N more" controls, in page units.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum LoadBatch {
    Five,
    Ten,
    Twenty,
}

impl LoadBatch {
    pub fn pages(&self) -> usize {
        match self {
            LoadBatch::Five => 1,
            LoadBatch::Ten => 2,
            LoadBatch::Twenty => 4,
        }
    }

    /// Maps a page count of 1, 2 or 4 back to its control.
    pub fn from_pages(pages: usize) -> Option<Self> {
        match pages {
            1 => Some(LoadBatch::Five),
            2 => Some(LoadBatch::Ten),
            4 => Some(LoadBatch::Twenty),
            _ => None,
        }
    }
}

/// Incrementally revealed prefix of the ordered view.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct PaginationState {
    current_page: usize,
    page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn visible_count(&self) -> usize {
        self.current_page * self.page_size
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn visible_slice<'a, T>(&self, view: &'a [T]) -> &'a [T] {
        &view[..self.visible_count().min(view.len())]
    }

    pub fn has_more<T>(&self, view: &[T]) -> bool {
        view.len() > self.visible_count()
    }

    pub fn advance(&mut self, batch: LoadBatch) {
        self.current_page += batch.pages();
    }

    /// Reveals the whole view. An empty view stays on page 1.
    pub fn jump_to_end(&mut self, view_len: usize) {
        self.current_page = view_len.div_ceil(self.page_size).max(1);
    }
}
