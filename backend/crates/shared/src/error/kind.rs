//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum used to classify failures coming out of the
//! storage layer.

use serde::Serialize;

/// Error category
///
/// Classifies a failure by what the caller can do about it rather than by
/// where it came from. Storage drivers map their native codes onto these
/// variants (see [`super::conversions`]).
///
/// ## Notes
/// * `non_exhaustive` - more variants may be added later
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::SchemaMissing;
/// assert_eq!(kind.as_str(), "Schema Missing");
/// assert!(!kind.is_transient());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Caller supplied an invalid value (configuration, window length, ...)
    InvalidInput,
    /// Backing schema, table or relation does not exist yet
    SchemaMissing,
    /// Serialization failure, deadlock or constraint violation
    Conflict,
    /// Connection lost, pool exhausted or server shutting down
    Unavailable,
    /// Statement or acquire timeout
    Timeout,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Human readable name
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Unavailable.as_str(), "Unavailable");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "Invalid Input",
            ErrorKind::SchemaMissing => "Schema Missing",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Unavailable => "Unavailable",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Internal => "Internal",
        }
    }

    /// Transient failures may succeed when the caller retries the same
    /// operation later. The store itself never retries.
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::Conflict | ErrorKind::Unavailable | ErrorKind::Timeout
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(ErrorKind::InvalidInput.as_str(), "Invalid Input");
        assert_eq!(ErrorKind::SchemaMissing.as_str(), "Schema Missing");
        assert_eq!(ErrorKind::Conflict.as_str(), "Conflict");
        assert_eq!(ErrorKind::Unavailable.as_str(), "Unavailable");
        assert_eq!(ErrorKind::Timeout.as_str(), "Timeout");
        assert_eq!(ErrorKind::Internal.as_str(), "Internal");
    }

    #[test]
    fn test_is_transient() {
        assert!(ErrorKind::Conflict.is_transient());
        assert!(ErrorKind::Unavailable.is_transient());
        assert!(ErrorKind::Timeout.is_transient());
        assert!(!ErrorKind::SchemaMissing.is_transient());
        assert!(!ErrorKind::InvalidInput.is_transient());
        assert!(!ErrorKind::Internal.is_transient());
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorKind::SchemaMissing).unwrap();
        assert_eq!(json, r#""SCHEMA_MISSING""#);
    }
}
