//! # Dashboard DB
//!
//! Storage for services, service versions, users and profiles.
//!
//! - [`store`]: Store traits shared by every backend
//! - [`fetch`]: Runs a [`dashboard_core::FetchPlan`] against a store
//! - [`postgres`]: Postgres backend with embedded migrations
//! - [`memory`]: Process-local backend used without a database
//! - [`seed`]: Idempotent baseline data

pub mod error;
pub mod fetch;
pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use fetch::{Fetched, execute};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use seed::seed_baseline;
pub use store::{Filter, ResourceStore, ServiceRepository, UserRepository};
