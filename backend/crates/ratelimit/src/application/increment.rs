//! Increment Use Case

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::rate_limit::ClientRateLimitInfo;

use crate::domain::repository::{CounterRepository, SchemaRepository};
use crate::domain::value_objects::{SessionScope, WindowLength};
use crate::error::RateLimitResult;

/// Increment Use Case
pub struct IncrementUseCase<R>
where
    R: CounterRepository + SchemaRepository,
{
    repo: Arc<R>,
    scope: Arc<SessionScope>,
    window: WindowLength,
}

impl<R> IncrementUseCase<R>
where
    R: CounterRepository + SchemaRepository,
{
    pub fn new(repo: Arc<R>, scope: Arc<SessionScope>, window: WindowLength) -> Self {
        Self {
            repo,
            scope,
            window,
        }
    }

    /// Record one hit for `key` in the window active at `reference_time`.
    ///
    /// A missing schema is bootstrapped before the original error is handed
    /// back; the hit itself is not retried.
    pub async fn execute(
        &self,
        key: &str,
        reference_time: DateTime<Utc>,
    ) -> RateLimitResult<ClientRateLimitInfo> {
        let tally = match self
            .repo
            .record_hit(&self.scope, key, self.window, reference_time)
            .await
        {
            Ok(tally) => tally,
            Err(err) if err.is_schema_missing() => {
                tracing::warn!(scope = %self.scope, "Rate limit schema missing, bootstrapping");

                if let Err(bootstrap_err) = self.repo.bootstrap(self.scope.kind).await {
                    tracing::error!(
                        scope = %self.scope,
                        error = %bootstrap_err,
                        "Rate limit schema bootstrap failed"
                    );
                }

                return Err(err);
            }
            Err(err) => return Err(err),
        };

        Ok(ClientRateLimitInfo::new(
            tally.total_hits,
            tally.session.expires_at,
        ))
    }
}
