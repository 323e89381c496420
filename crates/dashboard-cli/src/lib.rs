//! # Dashboard CLI
//!
//! Seeding and account utilities for the service dashboard.
//!
//! Everything here goes through the store traits from `dashboard-db`, so the
//! same code seeds Postgres from the binary and the in-memory store in tests.
//!
//! ```ignore
//! use dashboard_cli::seeder::{SeedConfig, seed_all};
//!
//! let report = seed_all(&store, &SeedConfig::new(20)).await?;
//! ```

pub mod seeder;
