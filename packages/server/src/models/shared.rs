use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

/// `?page=` query parameter of listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// One page of an ordered listing.
#[derive(Debug, Serialize)]
pub struct PageObj<T> {
    /// Current page number (1-based).
    pub number: u64,
    /// Total number of pages, at least 1.
    pub num_pages: u64,
    /// Total number of items across all pages.
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub object_list: Vec<T>,
}

impl<T> PageObj<T> {
    pub fn new(number: u64, num_pages: u64, count: u64, object_list: Vec<T>) -> Self {
        Self {
            number,
            num_pages,
            count,
            has_next: number < num_pages,
            has_previous: number > 1,
            object_list,
        }
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }
}

/// Number of pages needed for `count` items; an empty listing still has one page.
pub fn num_pages(count: u64, per_page: u64) -> u64 {
    Ord::max(count.div_ceil(per_page.max(1)), 1)
}

/// Resolve a raw `?page=` value against the page count.
///
/// Missing or non-numeric values give the first page, out-of-range numbers
/// give the last page.
pub fn resolve_page(raw: Option<&str>, num_pages: u64) -> u64 {
    match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(n)) if n >= 1 => (n as u64).min(num_pages),
        Some(Ok(_)) => num_pages,
        Some(Err(e)) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            num_pages
        }
        _ => 1,
    }
}
