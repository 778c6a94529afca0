//! Client-side pagination applied after the full result set is loaded.

use serde::{Deserialize, Serialize};

/// Paging parameters supplied by the caller.
///
/// Pagination only happens when both fields are present. A page size of zero
/// or below yields an empty page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_number: Option<i32>,
    pub page_size: Option<i32>,
}

impl PageRequest {
    /// Request for a specific page.
    pub fn new(page_number: i32, page_size: i32) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
    }

    /// Request returning the full listing.
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns `(skip, take)` or `None` when pagination is disabled.
    pub fn window(&self) -> Option<(usize, usize)> {
        let (page_number, page_size) = (self.page_number?, self.page_size?);
        let take = i64::from(page_size.max(0));
        let skip = ((i64::from(page_number) - 1) * take).max(0);
        Some((
            usize::try_from(skip).unwrap_or(usize::MAX),
            usize::try_from(take).unwrap_or(usize::MAX),
        ))
    }

    /// Slices `items` according to [`Self::window`].
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        match self.window() {
            Some((skip, take)) => items.into_iter().skip(skip).take(take).collect(),
            None => items,
        }
    }
}
