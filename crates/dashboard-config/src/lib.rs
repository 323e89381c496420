//! # Dashboard Config
//!
//! Configuration structures loaded once from environment variables at startup:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`access`]: permission matrix source and the authorization bypass list
//! - [`database`]: Postgres connection settings
//! - [`server`]: bind address
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//!
//! # Example
//!
//! ```ignore
//! use dashboard_config::{AccessConfig, CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let access_config = AccessConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod access;
pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

use thiserror::Error;

// Re-export commonly used types at crate root
pub use access::{AccessConfig, RoleGrant};
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {variable}: {reason}")]
    Invalid {
        variable: &'static str,
        reason: String,
    },
}
