//! Error conversions - storage error classification
//!
//! Maps driver-level failures onto [`ErrorKind`] so callers never have to
//! match on error message text.

use super::kind::ErrorKind;

// ============================================================================
// SQLSTATE classification
// ============================================================================

/// Classify a PostgreSQL SQLSTATE code
///
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
///
/// ## Examples
/// ```rust
/// use kernel::error::{conversions::classify_sqlstate, kind::ErrorKind};
/// assert_eq!(classify_sqlstate("3F000"), ErrorKind::SchemaMissing);
/// assert_eq!(classify_sqlstate("40001"), ErrorKind::Conflict);
/// ```
pub fn classify_sqlstate(code: &str) -> ErrorKind {
    match code {
        // invalid_schema_name, undefined_table
        "3F000" | "42P01" => ErrorKind::SchemaMissing,
        // Class 40: Transaction Rollback
        "40001" | "40P01" => ErrorKind::Conflict,
        // Class 23: Integrity Constraint Violation
        "23000" | "23001" | "23503" | "23505" => ErrorKind::Conflict,
        "23502" | "23514" => ErrorKind::InvalidInput,
        // query_canceled (statement_timeout), lock_not_available
        "57014" | "55P03" => ErrorKind::Timeout,
        _ => match code.get(..2) {
            // Class 08: Connection Exception
            // Class 53: Insufficient Resources
            // Class 57: Operator Intervention
            Some("08") | Some("53") | Some("57") => ErrorKind::Unavailable,
            // Class 22: Data Exception
            Some("22") => ErrorKind::InvalidInput,
            _ => ErrorKind::Internal,
        },
    }
}

// ============================================================================
// SQLx classification (feature-gated)
// ============================================================================

/// Classify a `sqlx::Error`
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| classify_sqlstate(code.as_ref()))
            .unwrap_or(ErrorKind::Internal),
        sqlx::Error::PoolTimedOut => ErrorKind::Timeout,
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed => {
            ErrorKind::Unavailable
        }
        sqlx::Error::Configuration(_) => ErrorKind::InvalidInput,
        _ => ErrorKind::Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_missing_codes() {
        assert_eq!(classify_sqlstate("3F000"), ErrorKind::SchemaMissing);
        assert_eq!(classify_sqlstate("42P01"), ErrorKind::SchemaMissing);
    }

    #[test]
    fn test_transient_codes() {
        assert_eq!(classify_sqlstate("40001"), ErrorKind::Conflict);
        assert_eq!(classify_sqlstate("40P01"), ErrorKind::Conflict);
        assert_eq!(classify_sqlstate("08006"), ErrorKind::Unavailable);
        assert_eq!(classify_sqlstate("53300"), ErrorKind::Unavailable);
        assert_eq!(classify_sqlstate("57P01"), ErrorKind::Unavailable);
        assert_eq!(classify_sqlstate("57014"), ErrorKind::Timeout);
    }

    #[test]
    fn test_other_codes() {
        assert_eq!(classify_sqlstate("23505"), ErrorKind::Conflict);
        assert_eq!(classify_sqlstate("22003"), ErrorKind::InvalidInput);
        assert_eq!(classify_sqlstate("42601"), ErrorKind::Internal);
        assert_eq!(classify_sqlstate(""), ErrorKind::Internal);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlx_error_classification() {
        assert_eq!(classify_sqlx(&sqlx::Error::PoolTimedOut), ErrorKind::Timeout);
        assert_eq!(classify_sqlx(&sqlx::Error::PoolClosed), ErrorKind::Unavailable);
        assert_eq!(classify_sqlx(&sqlx::Error::RowNotFound), ErrorKind::Internal);
        assert!(classify_sqlx(&sqlx::Error::PoolTimedOut).is_transient());
    }
}
