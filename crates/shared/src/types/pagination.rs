//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageRequest {
    /// Creates a page request after checking bounds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `page` is zero or `page_size` is
    /// outside `1..=200`.
    pub fn new(page: u32, page_size: u32) -> Result<Self, AppError> {
        let request = Self { page, page_size };
        request.validate()?;
        Ok(request)
    }

    /// Checks that the request is within bounds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` describing the offending field.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 || request.page_size == 0 {
            1
        } else {
            total.div_ceil(u64::from(request.page_size))
        };

        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages,
        }
    }
}
