//! Pagination for catalog listings
//!
//! `PaginationInput` is the wire shape; `Pagination` is the validated form.

use serde::{Deserialize, Serialize};

use crate::products::errors::ProductError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Offsets are bound as signed 64-bit integers by the database driver.
const MAX_SKIP: u64 = i64::MAX as u64;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64) -> Result<Self, ProductError> {
        if page < 1 {
            return Err(ProductError::Validation("page must be a positive number".into()));
        }
        if limit < 1 {
            return Err(ProductError::Validation("limit must be a positive number".into()));
        }
        if limit > MAX_LIMIT {
            return Err(ProductError::Validation(format!("limit must not be greater than {MAX_LIMIT}")));
        }
        match (page - 1).checked_mul(limit) {
            Some(skip) if skip <= MAX_SKIP => Ok(Self { page, limit }),
            _ => Err(ProductError::Validation("page is out of range".into())),
        }
    }

    /// Rows to skip before the requested page.
    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    pub fn take(&self) -> u64 { self.limit }

    /// Number of the last page holding `total` rows, rounded up.
    /// Zero rows means zero pages.
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT } }
}

/// Wire payload; both fields optional, unknown fields rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationInput {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl TryFrom<PaginationInput> for Pagination {
    type Error = ProductError;

    fn try_from(input: PaginationInput) -> Result<Self, Self::Error> {
        Pagination::new(input.page.unwrap_or(DEFAULT_PAGE), input.limit.unwrap_or(DEFAULT_LIMIT))
    }
}
