//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::application::config::DatabaseConfig;
use crate::domain::entities::{HitTally, Session};
use crate::domain::repository::{CounterRepository, SchemaRepository, SessionRepository};
use crate::domain::value_objects::{SessionKind, SessionScope, WindowLength};
use crate::error::RateLimitResult;
use crate::infra::counter::Counter;
use crate::infra::{schema, session};

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgRateLimitRepository {
    pool: PgPool,
}

impl PgRateLimitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool. Does not touch the schema.
    pub async fn connect(config: &DatabaseConfig) -> RateLimitResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connected to database"
        );

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

impl SessionRepository for PgRateLimitRepository {
    async fn lookup(
        &self,
        scope: &SessionScope,
        reference_time: DateTime<Utc>,
    ) -> RateLimitResult<Option<Session>> {
        session::find_active(&self.pool, scope, reference_time).await
    }

    async fn purge_expired(&self, reference_time: DateTime<Utc>) -> RateLimitResult<u64> {
        let deleted = session::purge_expired(&self.pool, reference_time).await?;

        tracing::info!(sessions = deleted, "Cleaned up expired rate limit sessions");

        Ok(deleted)
    }
}

impl CounterRepository for PgRateLimitRepository {
    async fn record_hit(
        &self,
        scope: &SessionScope,
        key: &str,
        window: WindowLength,
        reference_time: DateTime<Utc>,
    ) -> RateLimitResult<HitTally> {
        let counter = Counter::from(scope.kind);

        let mut tx = self.pool.begin().await?;
        let session = session::resolve_or_create(&mut *tx, scope, window, reference_time).await?;
        let total_hits = counter
            .bump(&mut *tx, key, &session.id, reference_time)
            .await?;
        tx.commit().await?;

        tracing::debug!(
            session_id = %session.id,
            key = key,
            total_hits = total_hits,
            "Hit recorded"
        );

        Ok(HitTally {
            session,
            total_hits,
        })
    }

    async fn remove_hit(&self, session: &Session, key: &str) -> RateLimitResult<()> {
        let removed = Counter::from(session.scope.kind)
            .unbump(&self.pool, key, &session.id)
            .await?;

        tracing::debug!(session_id = %session.id, key = key, removed = removed, "Hit removed");
        Ok(())
    }

    async fn clear_key(&self, session: &Session, key: &str) -> RateLimitResult<()> {
        let deleted = Counter::from(session.scope.kind)
            .clear_key(&self.pool, key, &session.id)
            .await?;

        tracing::debug!(session_id = %session.id, key = key, rows = deleted, "Key reset");
        Ok(())
    }

    async fn clear_session(&self, session: &Session) -> RateLimitResult<()> {
        let deleted = Counter::from(session.scope.kind)
            .clear_session(&self.pool, &session.id)
            .await?;

        tracing::info!(session_id = %session.id, rows = deleted, "Session counters reset");
        Ok(())
    }

    async fn count(&self, session: &Session, key: &str) -> RateLimitResult<u32> {
        Counter::from(session.scope.kind)
            .count(&self.pool, key, &session.id)
            .await
    }
}

impl SchemaRepository for PgRateLimitRepository {
    async fn bootstrap(&self, kind: SessionKind) -> RateLimitResult<()> {
        schema::bootstrap(&self.pool, kind).await
    }
}
