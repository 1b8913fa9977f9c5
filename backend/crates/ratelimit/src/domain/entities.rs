//! Domain Entities
//!
//! Core business entities for the rate limit domain.

use chrono::{DateTime, Utc};
use kernel::id::SessionId;

use crate::domain::services::{is_active, storage_precision, window_expiry};
use crate::domain::value_objects::{SessionScope, WindowLength};
use crate::error::{RateLimitError, RateLimitResult};

/// Session entity - one counting window for one (name, kind) scope
///
/// Sessions are never updated in place. A new window replaces the previous
/// row for the same scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub scope: SessionScope,
    pub registered_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Open a new window starting at `reference_time`
    pub fn open(
        scope: SessionScope,
        window: WindowLength,
        reference_time: DateTime<Utc>,
    ) -> RateLimitResult<Self> {
        let expires_at = window_expiry(reference_time, window).ok_or_else(|| {
            RateLimitError::Internal(format!(
                "window of {}ms overflows the timestamp range",
                window.as_millis()
            ))
        })?;

        Ok(Self {
            id: SessionId::new(),
            scope,
            registered_at: storage_precision(reference_time),
            expires_at,
        })
    }

    /// Check whether the window is still open at `reference_time`
    pub fn is_active_at(&self, reference_time: DateTime<Utc>) -> bool {
        is_active(self.expires_at, reference_time)
    }
}

/// Result of recording one hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitTally {
    pub session: Session,
    pub total_hits: u32,
}
