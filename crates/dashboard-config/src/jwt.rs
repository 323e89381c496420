use std::env;

use tracing::warn;

/// Thirty days, in seconds.
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 30 * 24 * 60 * 60;

const DEVELOPMENT_SECRET: &str = "dashboard-development-secret";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, access_token_expiry: i64) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry,
        }
    }

    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using the development secret");
            DEVELOPMENT_SECRET.to_string()
        });

        Self {
            secret,
            access_token_expiry: env::var("JWT_ACCESS_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|expiry: &i64| *expiry > 0)
                .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRY),
        }
    }
}
