//! Pagination metadata for collection responses.
//!
//! Every listing and search response is wrapped in a [`Page`]:
//!
//! ```json
//! {
//!   "data": [...],
//!   "meta": {
//!     "total": 42,
//!     "limit": 10,
//!     "offset": 20,
//!     "page": 3,
//!     "has_more": true
//!   }
//! }
//! ```
//!
//! `total` always counts the filtered set, so a search for `"api"` reports
//! how many services match `"api"`, not how many services exist.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::query::Window;

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items matching the request's filter
    pub total: i64,
    /// Maximum items per page (the limit that was applied)
    pub limit: i64,
    /// Current page number (1-indexed)
    pub page: i64,
    /// Number of items skipped before this page
    pub offset: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds the metadata for a window over a filtered set of `total` items.
    #[must_use]
    pub fn new(total: i64, window: Window) -> Self {
        let offset = window.offset();
        Self {
            total,
            limit: window.limit,
            page: window.page,
            offset,
            has_more: offset.saturating_add(window.limit) < total,
        }
    }
}

/// A page of records plus the metadata describing it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, window: Window) -> Self {
        Self {
            data,
            meta: PaginationMeta::new(total, window),
        }
    }
}
