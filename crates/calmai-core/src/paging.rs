//! Fixed-size pagination shared by the journal, patient and corpus views.

use serde::Serialize;

/// One page of a filtered collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page actually served. Differs from the requested page when
    /// the request was out of range.
    pub page: usize,
    pub page_size: usize,
    pub total_filtered: usize,
    /// `ceil(total_filtered / page_size)`; 0 when nothing matched.
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            total_filtered: 0,
            total_pages: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Slice `[page * page_size, (page + 1) * page_size)` out of `items`.
///
/// A `page_size` of 0 is treated as 1. A page past the end resets to the
/// first page rather than returning an empty slice of a non-empty set.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_filtered = items.len();
    let total_pages = total_pages(total_filtered, page_size);
    let page = if page < total_pages { page } else { 0 };

    let items = items
        .into_iter()
        .skip(page * page_size)
        .take(page_size)
        .collect();

    Page {
        items,
        page,
        page_size,
        total_filtered,
        total_pages,
    }
}
