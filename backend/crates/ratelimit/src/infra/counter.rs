//! Counter Engine
//!
//! Two interchangeable strategies behind one contract: the count of hits
//! for a (key, session) pair. Neither variant creates or deletes sessions.

use chrono::{DateTime, Utc};
use kernel::id::SessionId;
use sqlx::PgConnection;
use sqlx::postgres::PgExecutor;

use crate::domain::services::storage_precision;
use crate::domain::value_objects::SessionKind;
use crate::error::RateLimitResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// One row per (session, key) holding a running count
    Aggregate,
    /// One row per hit; the count is the row cardinality
    Individual,
}

impl From<SessionKind> for Counter {
    fn from(kind: SessionKind) -> Self {
        match kind {
            SessionKind::Aggregated => Counter::Aggregate,
            SessionKind::Individual => Counter::Individual,
        }
    }
}

impl Counter {
    /// Record one hit and return the post-increment count
    pub async fn bump(
        &self,
        conn: &mut PgConnection,
        key: &str,
        session_id: &SessionId,
        reference_time: DateTime<Utc>,
    ) -> RateLimitResult<u32> {
        match self {
            Counter::Aggregate => {
                let count = sqlx::query_scalar::<_, i32>(
                    r#"
                    INSERT INTO rate_limit.records_aggregated (key, session_id, count)
                    VALUES ($1, $2, 1)
                    ON CONFLICT ON CONSTRAINT records_aggregated_session_key
                    DO UPDATE SET count = records_aggregated.count + 1
                    RETURNING count
                    "#,
                )
                .bind(key)
                .bind(session_id.as_uuid())
                .fetch_one(&mut *conn)
                .await?;

                Ok(to_hits(i64::from(count)))
            }
            Counter::Individual => {
                sqlx::query(
                    r#"
                    INSERT INTO rate_limit.individual_records (key, event_time, session_id)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(key)
                .bind(storage_precision(reference_time))
                .bind(session_id.as_uuid())
                .execute(&mut *conn)
                .await?;

                // Recomputed, not a running total
                let count = sqlx::query_scalar::<_, i64>(
                    "SELECT count(*) FROM rate_limit.individual_records WHERE session_id = $1 AND key = $2",
                )
                .bind(session_id.as_uuid())
                .bind(key)
                .fetch_one(&mut *conn)
                .await?;

                Ok(to_hits(count))
            }
        }
    }

    /// Remove one hit. Aggregate counts floor at zero and keep their row;
    /// the individual log drops its oldest event.
    pub async fn unbump<'e, E>(&self, executor: E, key: &str, session_id: &SessionId) -> RateLimitResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = match self {
            Counter::Aggregate => {
                sqlx::query(
                    r#"
                    UPDATE rate_limit.records_aggregated
                    SET count = GREATEST(count - 1, 0)
                    WHERE session_id = $1 AND key = $2
                    "#,
                )
                .bind(session_id.as_uuid())
                .bind(key)
                .execute(executor)
                .await?
            }
            Counter::Individual => {
                sqlx::query(
                    r#"
                    DELETE FROM rate_limit.individual_records
                    WHERE id = (
                        SELECT id
                        FROM rate_limit.individual_records
                        WHERE session_id = $1 AND key = $2
                        ORDER BY event_time, id
                        LIMIT 1
                        FOR UPDATE SKIP LOCKED
                    )
                    "#,
                )
                .bind(session_id.as_uuid())
                .bind(key)
                .execute(executor)
                .await?
            }
        };

        Ok(result.rows_affected())
    }

    pub async fn clear_key<'e, E>(&self, executor: E, key: &str, session_id: &SessionId) -> RateLimitResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let sql = match self {
            Counter::Aggregate => {
                "DELETE FROM rate_limit.records_aggregated WHERE session_id = $1 AND key = $2"
            }
            Counter::Individual => {
                "DELETE FROM rate_limit.individual_records WHERE session_id = $1 AND key = $2"
            }
        };

        let deleted = sqlx::query(sql)
            .bind(session_id.as_uuid())
            .bind(key)
            .execute(executor)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    pub async fn clear_session<'e, E>(&self, executor: E, session_id: &SessionId) -> RateLimitResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let sql = match self {
            Counter::Aggregate => "DELETE FROM rate_limit.records_aggregated WHERE session_id = $1",
            Counter::Individual => "DELETE FROM rate_limit.individual_records WHERE session_id = $1",
        };

        let deleted = sqlx::query(sql)
            .bind(session_id.as_uuid())
            .execute(executor)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    /// Current hits; an absent row or log counts as zero
    pub async fn count<'e, E>(&self, executor: E, key: &str, session_id: &SessionId) -> RateLimitResult<u32>
    where
        E: PgExecutor<'e>,
    {
        let count = match self {
            Counter::Aggregate => sqlx::query_scalar::<_, i32>(
                "SELECT count FROM rate_limit.records_aggregated WHERE session_id = $1 AND key = $2",
            )
            .bind(session_id.as_uuid())
            .bind(key)
            .fetch_optional(executor)
            .await?
            .map(i64::from)
            .unwrap_or(0),
            Counter::Individual => sqlx::query_scalar::<_, i64>(
                "SELECT count(*) FROM rate_limit.individual_records WHERE session_id = $1 AND key = $2",
            )
            .bind(session_id.as_uuid())
            .bind(key)
            .fetch_one(executor)
            .await?,
        };

        Ok(to_hits(count))
    }
}

fn to_hits(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_from_kind() {
        assert_eq!(Counter::from(SessionKind::Aggregated), Counter::Aggregate);
        assert_eq!(Counter::from(SessionKind::Individual), Counter::Individual);
    }

    #[test]
    fn test_to_hits_clamps() {
        assert_eq!(to_hits(-3), 0);
        assert_eq!(to_hits(0), 0);
        assert_eq!(to_hits(42), 42);
        assert_eq!(to_hits(i64::MAX), u32::MAX);
    }
}
