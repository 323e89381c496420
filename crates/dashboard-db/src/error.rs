use thiserror::Error;
use tracing::error;

use dashboard_core::AppError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::not_found(err),
            StoreError::Conflict(_) => AppError::conflict(err),
            StoreError::Database(e) => {
                error!(error = %e, "Database error");
                AppError::internal_error("Internal server error")
            }
            StoreError::Unexpected(e) => {
                error!(error = ?e, "Store error");
                AppError::internal_error("Internal server error")
            }
        }
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
