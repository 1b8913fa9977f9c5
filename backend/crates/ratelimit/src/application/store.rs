//! Window Store
//!
//! Entry point for callers. Holds the repository, the configured scope and
//! window, and the clock that supplies the reference time of every call.

use std::sync::Arc;

use platform::clock::{Clock, SystemClock};
use platform::rate_limit::{ClientRateLimitInfo, RateLimitStore, StoreError};

use crate::application::config::{DatabaseConfig, StoreConfig};
use crate::application::decrement::DecrementUseCase;
use crate::application::get_hits::GetHitsUseCase;
use crate::application::increment::IncrementUseCase;
use crate::application::reset::ResetUseCase;
use crate::domain::repository::{CounterRepository, SchemaRepository, SessionRepository};
use crate::domain::value_objects::{SessionScope, StoreStrategy, WindowLength};
use crate::error::{RateLimitError, RateLimitResult};
use crate::infra::postgres::PgRateLimitRepository;

/// Store backed by PostgreSQL
pub type PgWindowStore = WindowStore<PgRateLimitRepository>;

/// Fixed-window hit store
pub struct WindowStore<R> {
    repo: Arc<R>,
    scope: Arc<SessionScope>,
    window: WindowLength,
    strategy: StoreStrategy,
    clock: Arc<dyn Clock>,
}

impl<R> Clone for WindowStore<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            scope: self.scope.clone(),
            window: self.window,
            strategy: self.strategy,
            clock: self.clock.clone(),
        }
    }
}

impl<R> WindowStore<R>
where
    R: SessionRepository + CounterRepository + SchemaRepository + Send + Sync + 'static,
{
    /// Validate `config` and bind it to `repo`. Does not touch the schema.
    pub fn new(repo: R, config: StoreConfig) -> RateLimitResult<Self> {
        let window = config.window_length()?;

        Ok(Self {
            repo: Arc::new(repo),
            scope: Arc::new(config.scope()),
            window,
            strategy: config.strategy,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the reference time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.scope.name
    }

    pub fn strategy(&self) -> StoreStrategy {
        self.strategy
    }

    pub fn window(&self) -> WindowLength {
        self.window
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Record one hit for `key`
    pub async fn increment(&self, key: &str) -> RateLimitResult<ClientRateLimitInfo> {
        IncrementUseCase::new(self.repo.clone(), self.scope.clone(), self.window)
            .execute(key, self.clock.now())
            .await
            .inspect_err(RateLimitError::log)
    }

    /// Remove one hit for `key`
    pub async fn decrement(&self, key: &str) -> RateLimitResult<()> {
        DecrementUseCase::new(self.repo.clone(), self.scope.clone())
            .execute(key, self.clock.now())
            .await
            .inspect_err(RateLimitError::log)
    }

    /// Remove all hits for `key`
    pub async fn reset_key(&self, key: &str) -> RateLimitResult<()> {
        ResetUseCase::new(self.repo.clone(), self.scope.clone())
            .reset_key(key, self.clock.now())
            .await
            .inspect_err(RateLimitError::log)
    }

    /// Remove all hits of the namespace
    pub async fn reset_all(&self) -> RateLimitResult<()> {
        ResetUseCase::new(self.repo.clone(), self.scope.clone())
            .reset_all(self.clock.now())
            .await
            .inspect_err(RateLimitError::log)
    }

    /// Current hits for `key` without recording one
    pub async fn get(&self, key: &str) -> RateLimitResult<Option<ClientRateLimitInfo>> {
        GetHitsUseCase::new(self.repo.clone(), self.scope.clone())
            .execute(key, self.clock.now())
            .await
            .inspect_err(RateLimitError::log)
    }

    /// Create the schema and tables for the configured strategy.
    /// Safe to call any number of times, from any number of processes.
    pub async fn bootstrap(&self) -> RateLimitResult<()> {
        self.repo
            .bootstrap(self.scope.kind)
            .await
            .inspect_err(RateLimitError::log)
    }

    /// Delete expired sessions of every namespace, with their counters
    pub async fn purge_expired(&self) -> RateLimitResult<u64> {
        self.repo
            .purge_expired(self.clock.now())
            .await
            .inspect_err(RateLimitError::log)
    }
}

impl PgWindowStore {
    /// Open the connection pool and build the store
    pub async fn init(config: StoreConfig, database: &DatabaseConfig) -> RateLimitResult<Self> {
        // Reject a bad window before opening any connection
        config.window_length()?;

        let repo = PgRateLimitRepository::connect(database).await?;
        let store = Self::new(repo, config)?;

        tracing::info!(
            prefix = store.prefix(),
            strategy = %store.strategy,
            window_ms = store.window.as_millis(),
            "Rate limit store initialized"
        );

        Ok(store)
    }

    /// Close the connection pool shared by every clone of this store
    pub async fn close(&self) {
        self.repo.close().await;
    }
}

impl<R> RateLimitStore for WindowStore<R>
where
    R: SessionRepository + CounterRepository + SchemaRepository + Send + Sync + 'static,
{
    async fn increment(&self, key: &str) -> Result<ClientRateLimitInfo, StoreError> {
        Ok(WindowStore::increment(self, key).await?)
    }

    async fn decrement(&self, key: &str) -> Result<(), StoreError> {
        Ok(WindowStore::decrement(self, key).await?)
    }

    async fn reset_key(&self, key: &str) -> Result<(), StoreError> {
        Ok(WindowStore::reset_key(self, key).await?)
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        Ok(WindowStore::reset_all(self).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<ClientRateLimitInfo>, StoreError> {
        Ok(WindowStore::get(self, key).await?)
    }
}
