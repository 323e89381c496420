//! # Dashboard Auth
//!
//! Authentication and authorization for the service dashboard API.
//!
//! - [`claims`]: access token claims
//! - [`jwt`]: token creation and verification
//! - [`issuer`]: credential check and token issuing
//! - [`permissions`]: the role to action permission matrix
//! - [`gate`]: the per-request authorization decision
//!
//! # Example
//!
//! ```ignore
//! use dashboard_auth::{AuthGate, GateDecision, issue_token};
//!
//! let token = issue_token(&store, "user1", "password", &jwt_config).await?;
//!
//! let gate = AuthGate::new(jwt_config, &access_config)?;
//! match gate.decide("/v1/services", &Method::GET, Some(&header)) {
//!     GateDecision::Allowed { role } => { /* run the handler */ }
//!     _ => { /* reject */ }
//! }
//! ```

pub mod claims;
pub mod error;
pub mod gate;
pub mod issuer;
pub mod jwt;
pub mod permissions;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use error::AuthError;
pub use gate::{AuthGate, GateDecision};
pub use issuer::{Credential, CredentialStore, issue_token};
pub use jwt::{bearer_token, create_access_token, verify_token};
pub use permissions::{Action, PermissionMatrix};
