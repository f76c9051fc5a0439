//! Numbered pagination shared by every list-producing handler.
//!
//! Feeds are sliced into fixed-size pages addressed by a 1-based page
//! number taken from the `page` query parameter. Requests for a
//! non-numeric or out-of-range page fall back to the first page rather
//! than erroring.

use serde::{Deserialize, Serialize};

/// Fixed page size for all feeds.
pub const PAGE_SIZE: u64 = 10;

/// The `page` query parameter, kept raw so that non-numeric input can be
/// resolved to the first page instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Raw value of the `page` query parameter.
    pub page: Option<String>,
}

impl PageQuery {
    /// The requested 1-based page number. Absent, non-numeric, or zero
    /// values select the first page.
    #[must_use]
    pub fn number(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(1)
    }
}

/// One page of an ordered result set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Build a page from fetched items and count metadata.
    #[must_use]
    pub fn new(items: Vec<T>, number: u64, total_items: u64, total_pages: u64) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            items,
            number,
            total_pages,
            total_items,
            has_next: number < total_pages,
            has_prev: number > 1,
        }
    }

    /// An empty first page.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 1, 0, 1)
    }

    /// Resolve a requested page number against the total page count.
    ///
    /// Out-of-range requests fall back to the first page.
    #[must_use]
    pub fn resolve_number(requested: u64, total_pages: u64) -> u64 {
        if requested >= 1 && requested <= total_pages.max(1) {
            requested
        } else {
            1
        }
    }

    /// Map the items of this page, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_pages: self.total_pages,
            total_items: self.total_items,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
