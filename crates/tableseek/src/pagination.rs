//! Page slicing and page metadata.

use serde::{Deserialize, Serialize};

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Page sizes offered to users.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// A 1-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    /// Requested page, starting at 1.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl PageRequest {
    /// Creates a request for `page` with `page_size` rows per page.
    pub fn new(page: usize, page_size: usize) -> Self {
        PageRequest { page, page_size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Metadata describing one page of a result.
///
/// `start_index` and `end_index` are 1-based inclusive display positions
/// ("Showing 3 to 3 of 3"), not array offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// The requested page, echoed back.
    pub current_page: usize,
    /// Number of pages; 0 when there are no items or the page size is 0.
    pub total_pages: usize,
    /// Number of rows across all pages.
    pub total_items: usize,
    /// Display position of the first row on this page.
    pub start_index: usize,
    /// Display position of the last row on this page.
    pub end_index: usize,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

/// One page of rows plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<T> {
    /// Rows on this page.
    pub data: Vec<T>,
    /// Where this page sits in the full result.
    pub pagination: PageInfo,
}

impl<T> PaginationResult<T> {
    /// Returns `true` if this page holds no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maps the rows of this page, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginationResult<U> {
        PaginationResult {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Computes the metadata for `page` of a `total_items`-row result.
///
/// The page number is not clamped: a page past the end yields an empty
/// window whose indices still follow the formulas. Page 0 reports
/// `start_index = end_index = 0`; a page size of 0 reports no pages.
pub fn page_info(total_items: usize, page: usize, page_size: usize) -> PageInfo {
    let total_pages = if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    };
    let (start_index, end_index) = if page == 0 {
        (0, 0)
    } else {
        let offset = (page - 1).saturating_mul(page_size);
        let end = offset.saturating_add(page_size).min(total_items);
        (offset.saturating_add(1), end)
    };

    PageInfo {
        current_page: page,
        total_pages,
        total_items,
        start_index,
        end_index,
        has_next_page: page < total_pages,
        has_prev_page: page > 1,
    }
}

/// Slices `data` to the requested page.
///
/// ```
/// use tableseek::apply_pagination;
///
/// let result = apply_pagination(&["a", "b", "c"], 2, 2);
/// assert_eq!(result.data, ["c"]);
/// assert_eq!(result.pagination.start_index, 3);
/// assert!(result.pagination.has_prev_page);
/// ```
pub fn apply_pagination<T: Clone>(data: &[T], page: usize, page_size: usize) -> PaginationResult<T> {
    let pagination = page_info(data.len(), page, page_size);
    let window: &[T] = if page == 0 || page_size == 0 {
        &[]
    } else {
        let offset = pagination.start_index - 1;
        data.get(offset..pagination.end_index).unwrap_or(&[])
    };

    PaginationResult {
        data: window.to_vec(),
        pagination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page() {
        let result = apply_pagination(&[1, 2, 3], 1, 2);
        assert_eq!(result.data, [1, 2]);
        assert_eq!(result.pagination.total_pages, 2);
        assert_eq!(result.pagination.start_index, 1);
        assert_eq!(result.pagination.end_index, 2);
        assert!(result.pagination.has_next_page);
        assert!(!result.pagination.has_prev_page);
    }

    #[test]
    fn last_partial_page() {
        let result = apply_pagination(&[1, 2, 3], 2, 2);
        assert_eq!(result.data, [3]);
        assert_eq!(result.pagination.start_index, 3);
        assert_eq!(result.pagination.end_index, 3);
        assert!(!result.pagination.has_next_page);
        assert!(result.pagination.has_prev_page);
    }

    #[test]
    fn page_larger_than_data() {
        let result = apply_pagination(&[1, 2, 3], 1, 10);
        assert_eq!(result.data, [1, 2, 3]);
        assert_eq!(result.pagination.total_pages, 1);
        assert!(!result.pagination.has_next_page);
    }

    #[test]
    fn page_past_the_end_is_not_clamped() {
        let result = apply_pagination(&[1, 2, 3], 5, 2);
        assert!(result.is_empty());
        assert_eq!(result.pagination.current_page, 5);
        assert_eq!(result.pagination.start_index, 9);
        assert_eq!(result.pagination.end_index, 3);
        assert!(!result.pagination.has_next_page);
        assert!(result.pagination.has_prev_page);
    }

    #[test]
    fn empty_data() {
        let data: [u8; 0] = [];
        let result = apply_pagination(&data, 1, 20);
        assert!(result.is_empty());
        assert_eq!(result.pagination.total_pages, 0);
        assert_eq!(result.pagination.end_index, 0);
        assert!(!result.pagination.has_next_page);
    }

    #[test]
    fn page_zero_is_empty() {
        let result = apply_pagination(&[1, 2, 3], 0, 2);
        assert!(result.is_empty());
        assert_eq!(result.pagination.start_index, 0);
        assert_eq!(result.pagination.end_index, 0);
        assert!(result.pagination.has_next_page);
        assert!(!result.pagination.has_prev_page);
    }

    #[test]
    fn page_size_zero_is_empty() {
        let result = apply_pagination(&[1, 2, 3], 1, 0);
        assert!(result.is_empty());
        assert_eq!(result.pagination.total_pages, 0);
        assert!(!result.pagination.has_next_page);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let result = apply_pagination(&[1, 2, 3], usize::MAX, usize::MAX);
        assert!(result.is_empty());
    }

    #[test]
    fn map_keeps_metadata() {
        let result = apply_pagination(&[1, 2, 3], 2, 2).map(|n| n * 10);
        assert_eq!(result.data, [30]);
        assert_eq!(result.pagination.start_index, 3);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(apply_pagination(&["a"], 1, 10)).unwrap();
        assert_eq!(json["pagination"]["currentPage"], 1);
        assert_eq!(json["pagination"]["hasNextPage"], false);
        assert_eq!(json["data"][0], "a");
    }

    #[test]
    fn page_request_defaults() {
        assert_eq!(PageRequest::default(), PageRequest::new(1, DEFAULT_PAGE_SIZE));
        let parsed: PageRequest = serde_json::from_str(r#"{"pageSize": 50}"#).unwrap();
        assert_eq!(parsed, PageRequest::new(1, 50));
    }
}
