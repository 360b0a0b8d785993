//! Offset pagination primitives shared by backend endpoints.
//!
//! Listings paginate with a 1-based page number and a page size. Page `p`
//! with size `k` maps to `offset = (p - 1) * k`, so a collection of 7 items
//! with `per_page = 3` yields pages of 3, 3, and 1 items at offsets 0, 3,
//! and 6.

use serde::Serialize;

/// Page size applied when a request does not name one.
pub const DEFAULT_PER_PAGE: u32 = 6;

/// Upper bound on the page size accepted from clients.
pub const MAX_PER_PAGE: u32 = 50;

/// Validation errors returned when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are 1-based; zero has no offset.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// A zero page size would make every listing empty.
    #[error("per_page must be at least 1")]
    ZeroPerPage,
    /// Page size exceeds the configured ceiling.
    #[error("per_page must not exceed {max}")]
    PerPageTooLarge {
        /// The configured ceiling.
        max: u32,
    },
}

/// Validated pagination parameters for a listing request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 3).expect("valid request");
/// assert_eq!(request.offset(), 6);
/// assert_eq!(request.limit(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate a 1-based page number and page size.
    ///
    /// # Errors
    ///
    /// Returns a [`PageRequestError`] when either value is zero or the page
    /// size exceeds [`MAX_PER_PAGE`].
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if per_page == 0 {
            return Err(PageRequestError::ZeroPerPage);
        }
        if per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageTooLarge { max: MAX_PER_PAGE });
        }
        Ok(Self { page, per_page })
    }

    /// The first page at the default size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items to skip: `(page - 1) * per_page`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Number of items to fetch.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of results together with the collection's total size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, at most `per_page` of them.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// 1-based page number this envelope covers.
    pub page: u32,
    /// Page size the listing was cut with.
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Assemble an envelope from fetched items and the total count.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            per_page: request.per_page(),
        }
    }

    /// Map the page's items while keeping the envelope metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
