//! # Pagination
//!
//! Page requests and the arithmetic behind paginated list responses.
//!
//! ```text
//!   N = 25 rows, pageSize = 10
//!
//!   page 1: rows  0..10   (10 items)
//!   page 2: rows 10..20   (10 items)
//!   page 3: rows 20..25   ( 5 items)
//!   page 4: nothing       ( 0 items, still a valid request)
//!
//!   totalPages = ceil(25 / 10) = 3
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// A validated page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// ## Errors
    /// - `page` below 1
    /// - `page_size` outside `1..=MAX_PAGE_SIZE`
    pub fn new(page: u32, page_size: u32) -> Result<Self, ValidationError> {
        if page < 1 {
            return Err(ValidationError::OutOfRange {
                field: "page".to_string(),
                min: 1,
                max: u32::MAX as i64,
            });
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ValidationError::OutOfRange {
                field: "pageSize".to_string(),
                min: 1,
                max: MAX_PAGE_SIZE as i64,
            });
        }

        Ok(Self { page, page_size })
    }

    /// Builds a request from optional query parameters, filling defaults
    /// (page 1, [`DEFAULT_PAGE_SIZE`]).
    ///
    /// ```rust
    /// use stockroom_core::pagination::PageRequest;
    ///
    /// let request = PageRequest::from_query(None, None).unwrap();
    /// assert_eq!((request.page(), request.page_size()), (1, 10));
    /// assert!(PageRequest::from_query(Some(0), None).is_err());
    /// ```
    pub fn from_query(page: Option<u32>, page_size: Option<u32>) -> Result<Self, ValidationError> {
        Self::new(page.unwrap_or(1), page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Rows to take.
    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }

    /// `ceil(total / page_size)`; zero rows means zero pages.
    pub fn total_pages(total: i64, page_size: u32) -> u32 {
        if total <= 0 || page_size == 0 {
            return 0;
        }
        let size = page_size as i64;
        ((total + size - 1) / size) as u32
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a list plus the numbers the dashboard needs for its pager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64, request: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: PageRequest::total_pages(total_count, request.page_size()),
        }
    }
}
