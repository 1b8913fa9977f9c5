//! Domain Services
//!
//! Pure window arithmetic shared by every repository implementation.

use chrono::{DateTime, SubsecRound, Utc};

use crate::domain::value_objects::WindowLength;

/// Timestamps are kept at microsecond precision, the resolution of
/// PostgreSQL `timestamptz`.
pub fn storage_precision(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

/// End of a window opened at `reference_time`
pub fn window_expiry(reference_time: DateTime<Utc>, window: WindowLength) -> Option<DateTime<Utc>> {
    storage_precision(reference_time).checked_add_signed(window.as_delta())
}

/// A window is active while its end lies strictly after the reference time
pub fn is_active(expires_at: DateTime<Utc>, reference_time: DateTime<Utc>) -> bool {
    expires_at > reference_time
}
