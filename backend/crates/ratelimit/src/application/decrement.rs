//! Decrement Use Case

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::repository::{CounterRepository, SessionRepository};
use crate::domain::value_objects::SessionScope;
use crate::error::RateLimitResult;

/// Decrement Use Case
pub struct DecrementUseCase<R>
where
    R: SessionRepository + CounterRepository,
{
    repo: Arc<R>,
    scope: Arc<SessionScope>,
}

impl<R> DecrementUseCase<R>
where
    R: SessionRepository + CounterRepository,
{
    pub fn new(repo: Arc<R>, scope: Arc<SessionScope>) -> Self {
        Self { repo, scope }
    }

    /// Remove one hit for `key`. Without an active session this does nothing.
    pub async fn execute(&self, key: &str, reference_time: DateTime<Utc>) -> RateLimitResult<()> {
        let Some(session) = self.repo.lookup(&self.scope, reference_time).await? else {
            tracing::debug!(scope = %self.scope, key = key, "No active window, decrement skipped");
            return Ok(());
        };

        self.repo.remove_hit(&session, key).await
    }
}
