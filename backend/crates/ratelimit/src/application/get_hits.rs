//! Get Hits Use Case

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::rate_limit::ClientRateLimitInfo;

use crate::domain::repository::{CounterRepository, SessionRepository};
use crate::domain::value_objects::SessionScope;
use crate::error::RateLimitResult;

/// Get Hits Use Case
pub struct GetHitsUseCase<R>
where
    R: SessionRepository + CounterRepository,
{
    repo: Arc<R>,
    scope: Arc<SessionScope>,
}

impl<R> GetHitsUseCase<R>
where
    R: SessionRepository + CounterRepository,
{
    pub fn new(repo: Arc<R>, scope: Arc<SessionScope>) -> Self {
        Self { repo, scope }
    }

    /// Current hits for `key`, or `None` when no window is open
    pub async fn execute(
        &self,
        key: &str,
        reference_time: DateTime<Utc>,
    ) -> RateLimitResult<Option<ClientRateLimitInfo>> {
        let Some(session) = self.repo.lookup(&self.scope, reference_time).await? else {
            return Ok(None);
        };

        let total_hits = self.repo.count(&session, key).await?;

        Ok(Some(ClientRateLimitInfo::new(total_hits, session.expires_at)))
    }
}
