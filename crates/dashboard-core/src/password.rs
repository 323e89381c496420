use bcrypt::{DEFAULT_COST, hash, verify};
use tracing::error;

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        AppError::internal_error("Failed to hash password")
    })
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed).map_err(|e| {
        error!(error = %e, "Failed to verify password");
        AppError::internal_error("Failed to verify password")
    })
}
