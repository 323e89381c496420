//! Per-request authorization decision.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. bypass list
//! 2. token presence and bearer format
//! 3. token validity
//! 4. role permission for the request method
//!
//! A request that is both unauthenticated and asking for a forbidden method
//! is therefore always reported as unauthenticated.

use axum::http::{HeaderValue, Method};
use tracing::debug;

use dashboard_config::{AccessConfig, ConfigError, JwtConfig};

use crate::error::AuthError;
use crate::jwt::{bearer_token, verify_token};
use crate::permissions::PermissionMatrix;

#[derive(Debug)]
pub enum GateDecision {
    Bypass,
    Unauthenticated(AuthError),
    Forbidden { role: String },
    Allowed { role: String },
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    jwt_config: JwtConfig,
    matrix: PermissionMatrix,
    public_paths: Vec<String>,
}

impl AuthGate {
    pub fn new(jwt_config: JwtConfig, access: &AccessConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            jwt_config,
            matrix: PermissionMatrix::from_config(access)?,
            public_paths: access.public_paths.clone(),
        })
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths
            .iter()
            .any(|pattern| match pattern.strip_suffix("/*") {
                Some(prefix) => {
                    path == prefix
                        || path
                            .strip_prefix(prefix)
                            .is_some_and(|rest| rest.starts_with('/'))
                }
                None => path == pattern,
            })
    }

    pub fn decide(
        &self,
        path: &str,
        method: &Method,
        authorization: Option<&HeaderValue>,
    ) -> GateDecision {
        if self.is_public(path) {
            return GateDecision::Bypass;
        }

        let header = match authorization.map(HeaderValue::to_str).transpose() {
            Ok(header) => header,
            Err(_) => return GateDecision::Unauthenticated(AuthError::MalformedHeader),
        };

        let verified =
            bearer_token(header).and_then(|token| verify_token(token, &self.jwt_config));
        let claims = match verified {
            Ok(claims) => claims,
            Err(err) => return GateDecision::Unauthenticated(err),
        };

        if self.matrix.is_method_allowed(&claims.role, method) {
            GateDecision::Allowed { role: claims.role }
        } else {
            debug!(role = %claims.role, %method, path, "Role lacks permission");
            GateDecision::Forbidden { role: claims.role }
        }
    }
}
