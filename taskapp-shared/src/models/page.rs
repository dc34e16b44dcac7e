/// Pagination types
///
/// Every list endpoint takes a zero-based `page` and a `size` (default 0 and
/// 10) and answers with a [`Page`] that carries the totals needed to render
/// paging controls.

use serde::Serialize;

/// Default page size when the client does not send one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound applied to client supplied page sizes
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Rejected pagination parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("Page size must not be less than one")]
    ZeroSize,
}

/// Which slice of a listing to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Builds a page request; sizes above [`MAX_PAGE_SIZE`] are clamped
    pub fn new(page: u32, size: u32) -> Result<Self, PageError> {
        if size == 0 {
            return Err(PageError::ZeroSize);
        }

        Ok(Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
        })
    }

    /// Zero-based page index
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Number of rows to take
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub content: Vec<T>,

    /// Zero-based page index
    pub page: u32,

    /// Requested page size
    pub size: u32,

    /// Number of items across all pages
    pub total_elements: i64,

    /// Number of pages at this size
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        let size = i64::from(request.size());
        let total_pages = (total_elements + size - 1) / size;

        Self {
            content,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages,
        }
    }
}
