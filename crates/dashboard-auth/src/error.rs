use jsonwebtoken::Algorithm;
use thiserror::Error;

use dashboard_core::AppError;

/// Failures of the authentication pipeline.
///
/// Unknown user and wrong password both surface as
/// [`AuthError::InvalidCredentials`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization token not provided")]
    MissingToken,

    #[error("Invalid authorization header format, expected 'Bearer <token>'")]
    MalformedHeader,

    #[error("Unexpected signing method: {0:?}")]
    UnexpectedSigningMethod(Algorithm),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid username or password")]
    MissingCredentials,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Could not generate token")]
    TokenGenerationFailed,

    #[error("Could not verify credentials")]
    CredentialCheckFailed,

    #[error("Could not look up credentials")]
    CredentialStore(#[source] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken
            | AuthError::MalformedHeader
            | AuthError::UnexpectedSigningMethod(_)
            | AuthError::InvalidToken
            | AuthError::InvalidCredentials => AppError::unauthorized(err.to_string()),
            AuthError::MissingCredentials => AppError::bad_request(err),
            AuthError::TokenGenerationFailed
            | AuthError::CredentialCheckFailed
            | AuthError::CredentialStore(_) => AppError::internal_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::MalformedHeader, StatusCode::UNAUTHORIZED),
            (
                AuthError::UnexpectedSigningMethod(Algorithm::RS256),
                StatusCode::UNAUTHORIZED,
            ),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::MissingCredentials, StatusCode::BAD_REQUEST),
            (
                AuthError::TokenGenerationFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::CredentialStore(anyhow::anyhow!("connection reset")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn test_store_failure_detail_is_not_exposed() {
        let err = AppError::from(AuthError::CredentialStore(anyhow::anyhow!(
            "password authentication failed for user postgres"
        )));
        assert_eq!(err.message(), "Could not look up credentials");
    }
}
