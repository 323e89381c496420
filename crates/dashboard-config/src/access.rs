//! Access control configuration.
//!
//! - `DASHBOARD_PERMISSIONS`: semicolon-separated `role=VERB,VERB` entries
//!   (default: `admin=GET,POST,PUT,DELETE;user=GET`)
//! - `DASHBOARD_PUBLIC_PATHS`: comma-separated paths that skip authorization.
//!   An entry ending in `/*` matches the prefix and everything below it.
//!
//! Verbs are kept as strings here; the auth crate turns them into its closed
//! action enum and rejects unknown ones at startup.

use std::env;

use crate::ConfigError;

pub const DEFAULT_PERMISSIONS: &str = "admin=GET,POST,PUT,DELETE;user=GET";
pub const DEFAULT_PUBLIC_PATHS: &str = "/v1/auth,/health,/swagger-ui/*,/api-docs/*";

const PERMISSIONS_VAR: &str = "DASHBOARD_PERMISSIONS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: String,
    pub verbs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessConfig {
    pub grants: Vec<RoleGrant>,
    pub public_paths: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            grants: parse_grants(DEFAULT_PERMISSIONS).unwrap_or_default(),
            public_paths: parse_paths(DEFAULT_PUBLIC_PATHS),
        }
    }
}

impl AccessConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let grants = match env::var(PERMISSIONS_VAR) {
            Ok(raw) => parse_grants(&raw)?,
            Err(_) => parse_grants(DEFAULT_PERMISSIONS)?,
        };
        let public_paths = parse_paths(
            &env::var("DASHBOARD_PUBLIC_PATHS").unwrap_or_else(|_| DEFAULT_PUBLIC_PATHS.to_string()),
        );

        Ok(Self {
            grants,
            public_paths,
        })
    }
}

pub fn parse_grants(raw: &str) -> Result<Vec<RoleGrant>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (role, verbs) = entry.split_once('=').ok_or_else(|| ConfigError::Invalid {
                variable: PERMISSIONS_VAR,
                reason: format!("expected role=VERBS, got '{entry}'"),
            })?;
            let role = role.trim();
            if role.is_empty() {
                return Err(ConfigError::Invalid {
                    variable: PERMISSIONS_VAR,
                    reason: format!("missing role name in '{entry}'"),
                });
            }

            Ok(RoleGrant {
                role: role.to_string(),
                verbs: verbs
                    .split(',')
                    .map(|v| v.trim().to_uppercase())
                    .filter(|v| !v.is_empty())
                    .collect(),
            })
        })
        .collect()
}

fn parse_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
