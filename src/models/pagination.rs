//! Page arithmetic shared by every listing endpoint

use serde::Serialize;
use utoipa::ToSchema;

/// Upper bound for `limit` on any listing
pub const MAX_LIMIT: i64 = 100;

/// A clamped 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Missing values take the default; out-of-range values are clamped.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Never 0, so pagers can always render at least one page
    pub fn total_pages(&self, total: i64) -> i64 {
        ((total + self.limit - 1) / self.limit).max(1)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Rows of the requested page
    pub data: Vec<T>,
    /// Current page number
    pub page: i64,
    /// Rows per page
    pub limit: i64,
    /// Total number of matching rows
    pub total: i64,
    /// Number of pages (at least 1)
    pub total_pages: i64,
}

impl<T> Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            data,
            page: request.page,
            limit: request.limit,
            total,
            total_pages: request.total_pages(total),
        }
    }
}
