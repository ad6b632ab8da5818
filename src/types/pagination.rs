//! Pagination for list endpoints.

use crate::config::{FIRST_PAGE, LAST_PAGE, PAGE_SIZE};

/// Fixed-size page selection.
///
/// Page numbers are 1-indexed; anything below the first page is clamped to it
/// and anything past `LAST_PAGE` is clamped down so the offset stays bindable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
}

impl PageRequest {
    pub fn new(page: i64) -> Self {
        let page = (page.max(FIRST_PAGE) as u64).min(LAST_PAGE);
        Self { page }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }

    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(FIRST_PAGE)
    }
}
