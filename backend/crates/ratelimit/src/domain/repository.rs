//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Every method receives the reference time explicitly so that window
//! boundaries are decided by the caller's clock, not by the backend.

use chrono::{DateTime, Utc};

use crate::domain::entities::{HitTally, Session};
use crate::domain::value_objects::{SessionKind, SessionScope, WindowLength};
use crate::error::RateLimitResult;

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Find the session of `scope` that is still active at `reference_time`.
    /// Never creates one.
    async fn lookup(
        &self,
        scope: &SessionScope,
        reference_time: DateTime<Utc>,
    ) -> RateLimitResult<Option<Session>>;

    /// Delete every session that expired at or before `reference_time`,
    /// together with its counters
    async fn purge_expired(&self, reference_time: DateTime<Utc>) -> RateLimitResult<u64>;
}

/// Counter repository trait
///
/// The counting strategy is selected by `scope.kind` / `session.scope.kind`.
#[trait_variant::make(CounterRepository: Send)]
pub trait LocalCounterRepository {
    /// Resolve or open the active session of `scope` and record one hit for
    /// `key`, as one serialized unit
    async fn record_hit(
        &self,
        scope: &SessionScope,
        key: &str,
        window: WindowLength,
        reference_time: DateTime<Utc>,
    ) -> RateLimitResult<HitTally>;

    /// Remove one hit for `key` (never below zero)
    async fn remove_hit(&self, session: &Session, key: &str) -> RateLimitResult<()>;

    /// Remove all hits for `key`
    async fn clear_key(&self, session: &Session, key: &str) -> RateLimitResult<()>;

    /// Remove all hits of the session
    async fn clear_session(&self, session: &Session) -> RateLimitResult<()>;

    /// Current hits for `key`
    async fn count(&self, session: &Session, key: &str) -> RateLimitResult<u32>;
}

/// Schema repository trait
#[trait_variant::make(SchemaRepository: Send)]
pub trait LocalSchemaRepository {
    /// Idempotently create the schema, the sessions table and the counter
    /// table used by `kind`
    async fn bootstrap(&self, kind: SessionKind) -> RateLimitResult<()>;
}
