//! Session Manager
//!
//! Owns session identity and window boundaries. Counter tables are only
//! touched indirectly, through `ON DELETE CASCADE` when a session row goes.

use chrono::{DateTime, Utc};
use kernel::id::SessionId;
use sqlx::PgConnection;
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::domain::value_objects::{SessionKind, SessionScope, WindowLength};
use crate::error::{RateLimitError, RateLimitResult};

/// Return the active session of `scope`, opening a new window if there is none.
///
/// Must run inside a transaction: the table lock is held until commit, so
/// concurrent first hits of a window create exactly one session.
pub async fn resolve_or_create(
    conn: &mut PgConnection,
    scope: &SessionScope,
    window: WindowLength,
    reference_time: DateTime<Utc>,
) -> RateLimitResult<Session> {
    // Self-conflicting; plain SELECTs from find_active() still proceed
    sqlx::query("LOCK TABLE rate_limit.sessions IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *conn)
        .await?;

    if let Some(session) = find_active(&mut *conn, scope, reference_time).await? {
        return Ok(session);
    }

    let session = Session::open(scope.clone(), window, reference_time)?;

    // Expired row for the same scope, if any; its counters cascade away
    let replaced = sqlx::query("DELETE FROM rate_limit.sessions WHERE name = $1 AND session_type = $2")
        .bind(&scope.name)
        .bind(scope.kind.as_str())
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let row = sqlx::query_as::<_, SessionRow>(
        r#"
        INSERT INTO rate_limit.sessions (
            id,
            name,
            session_type,
            registered_at,
            expires_at
        ) VALUES ($1, $2, $3, $4, $5)
        RETURNING
            id,
            name,
            session_type,
            registered_at,
            expires_at
        "#,
    )
    .bind(session.id.as_uuid())
    .bind(&scope.name)
    .bind(scope.kind.as_str())
    .bind(session.registered_at)
    .bind(session.expires_at)
    .fetch_one(&mut *conn)
    .await?;

    let session = row.into_session()?;

    tracing::info!(
        session_id = %session.id,
        scope = %scope,
        expires_at = %session.expires_at,
        replaced = replaced > 0,
        "Rate limit window opened"
    );

    Ok(session)
}

/// Read-only lookup of the session of `scope` active at `reference_time`
pub async fn find_active<'e, E>(
    executor: E,
    scope: &SessionScope,
    reference_time: DateTime<Utc>,
) -> RateLimitResult<Option<Session>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, SessionRow>(
        r#"
        SELECT
            id,
            name,
            session_type,
            registered_at,
            expires_at
        FROM rate_limit.sessions
        WHERE name = $1 AND session_type = $2 AND expires_at > $3
        LIMIT 1
        "#,
    )
    .bind(&scope.name)
    .bind(scope.kind.as_str())
    .bind(reference_time)
    .fetch_optional(executor)
    .await?;

    row.map(SessionRow::into_session).transpose()
}

/// Delete sessions whose window ended at or before `reference_time`
pub async fn purge_expired<'e, E>(executor: E, reference_time: DateTime<Utc>) -> RateLimitResult<u64>
where
    E: PgExecutor<'e>,
{
    let deleted = sqlx::query("DELETE FROM rate_limit.sessions WHERE expires_at <= $1")
        .bind(reference_time)
        .execute(executor)
        .await?
        .rows_affected();

    Ok(deleted)
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    name: String,
    session_type: String,
    registered_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> RateLimitResult<Session> {
        let kind = SessionKind::from_db(&self.session_type).ok_or_else(|| {
            RateLimitError::Internal(format!("Invalid session_type: {}", self.session_type))
        })?;

        Ok(Session {
            id: SessionId::from_uuid(self.id),
            scope: SessionScope::new(self.name, kind),
            registered_at: self.registered_at,
            expires_at: self.expires_at,
        })
    }
}
