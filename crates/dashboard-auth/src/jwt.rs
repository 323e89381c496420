//! JWT utilities for access tokens.
//!
//! Tokens are signed with the shared secret from [`JwtConfig`]. Only the HMAC
//! family (HS256, HS384, HS512) is accepted on the way back in: a token whose
//! header declares any other algorithm is rejected before the signature is
//! looked at.
//!
//! # Example
//!
//! ```ignore
//! use dashboard_auth::{bearer_token, create_access_token, verify_token};
//! use dashboard_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token("user1", "admin", &config)?;
//!
//! let raw = bearer_token(Some(&format!("Bearer {token}")))?;
//! let claims = verify_token(raw, &config)?;
//! assert_eq!(claims.role, "admin");
//! ```

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use tracing::{debug, error};

use dashboard_config::JwtConfig;

use crate::claims::Claims;
use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Creates an HS256 access token for `username` carrying `role`.
///
/// The token expires `jwt_config.access_token_expiry` seconds from now.
pub fn create_access_token(
    username: &str,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: username.to_string(),
        role: role.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, "Failed to create token");
        AuthError::TokenGenerationFailed
    })
}

/// Verifies an access token and returns its claims.
///
/// # Errors
///
/// - [`AuthError::MissingToken`] for an empty string
/// - [`AuthError::UnexpectedSigningMethod`] when the header names a non-HMAC algorithm
/// - [`AuthError::InvalidToken`] for anything malformed, badly signed or expired
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AuthError> {
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let header = decode_header(token).map_err(|e| {
        debug!(error = %e, "Rejected token with unreadable header");
        AuthError::InvalidToken
    })?;
    if !HMAC_ALGORITHMS.contains(&header.alg) {
        return Err(AuthError::UnexpectedSigningMethod(header.alg));
    }

    let mut validation = Validation::new(header.alg);
    validation.algorithms = HMAC_ALGORITHMS.to_vec();
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!(error = %e, "Rejected token");
        AuthError::InvalidToken
    })?;

    // jsonwebtoken still accepts exp == now
    if claims.exp <= Utc::now().timestamp() as usize {
        debug!("Rejected token at its expiry second");
        return Err(AuthError::InvalidToken);
    }

    Ok(claims)
}

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.unwrap_or_default();
    if value.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}
