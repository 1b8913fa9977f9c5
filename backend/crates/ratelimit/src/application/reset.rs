//! Reset Use Cases

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::repository::{CounterRepository, SessionRepository};
use crate::domain::value_objects::SessionScope;
use crate::error::RateLimitResult;

/// Reset Use Case
///
/// Both operations act on the active session only; counters of an expired
/// session are left for the next window or for `purge_expired`.
pub struct ResetUseCase<R>
where
    R: SessionRepository + CounterRepository,
{
    repo: Arc<R>,
    scope: Arc<SessionScope>,
}

impl<R> ResetUseCase<R>
where
    R: SessionRepository + CounterRepository,
{
    pub fn new(repo: Arc<R>, scope: Arc<SessionScope>) -> Self {
        Self { repo, scope }
    }

    /// Drop every hit recorded for `key`
    pub async fn reset_key(&self, key: &str, reference_time: DateTime<Utc>) -> RateLimitResult<()> {
        match self.repo.lookup(&self.scope, reference_time).await? {
            Some(session) => self.repo.clear_key(&session, key).await,
            None => Ok(()),
        }
    }

    /// Drop every hit of the namespace. The session itself stays open.
    pub async fn reset_all(&self, reference_time: DateTime<Utc>) -> RateLimitResult<()> {
        match self.repo.lookup(&self.scope, reference_time).await? {
            Some(session) => self.repo.clear_session(&session).await,
            None => Ok(()),
        }
    }
}
