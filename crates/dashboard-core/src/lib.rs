//! # Dashboard Core
//!
//! Core types, errors, and utilities for the service dashboard API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination metadata and the collection envelope
//! - [`password`]: Password hashing and verification
//! - [`query`]: Translation of raw listing parameters into a fetch plan
//!
//! # Example
//!
//! ```ignore
//! use dashboard_core::errors::AppError;
//! use dashboard_core::query::plan;
//!
//! let fetch = plan::<Service>(&params)?;
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod query;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{Page, PaginationMeta};
pub use password::{hash_password, verify_password};
pub use query::{
    FetchMode, FetchPlan, Listable, QueryError, Sort, SortField, SortOrder, Window, parse_id, plan,
};
