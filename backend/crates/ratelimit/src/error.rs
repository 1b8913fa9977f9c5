//! Rate Limit Error Types
//!
//! This module provides store-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Store-specific result type alias
pub type RateLimitResult<T> = Result<T, RateLimitError>;

/// Store-specific error variants
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// The `rate_limit` schema or one of its tables does not exist yet
    #[error("Rate limit schema is not initialized: {0}")]
    SchemaMissing(#[source] sqlx::Error),

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any other database failure, propagated verbatim
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for RateLimitError {
    fn from(err: sqlx::Error) -> Self {
        match classify_sqlx(&err) {
            ErrorKind::SchemaMissing => RateLimitError::SchemaMissing(err),
            _ => RateLimitError::Database(err),
        }
    }
}

impl RateLimitError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RateLimitError::SchemaMissing(_) => ErrorKind::SchemaMissing,
            RateLimitError::InvalidConfig(_) => ErrorKind::InvalidInput,
            RateLimitError::Database(e) => classify_sqlx(e),
            RateLimitError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_schema_missing(&self) -> bool {
        matches!(self, RateLimitError::SchemaMissing(_))
    }

    /// Connection loss, timeouts and serialization conflicts
    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            RateLimitError::SchemaMissing(e) => {
                tracing::warn!(error = %e, "Rate limit schema missing");
            }
            RateLimitError::Database(e) if self.is_transient() => {
                tracing::warn!(error = %e, kind = %self.kind(), "Transient rate limit database error");
            }
            RateLimitError::Database(e) => {
                tracing::error!(error = %e, "Rate limit database error");
            }
            RateLimitError::Internal(msg) => {
                tracing::error!(message = %msg, "Rate limit internal error");
            }
            RateLimitError::InvalidConfig(msg) => {
                tracing::debug!(message = %msg, "Rate limit configuration rejected");
            }
        }
    }
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let app_err = AppError::new(kind, message).with_source(err);
        match kind {
            ErrorKind::SchemaMissing => {
                app_err.with_action("Schema bootstrap was triggered; retry the request")
            }
            k if k.is_transient() => app_err.with_action("Retry the request later"),
            _ => app_err,
        }
    }
}
