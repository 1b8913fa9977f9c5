//! Schema bootstrap
//!
//! Every statement is `IF NOT EXISTS`, so running the bootstrap against an
//! initialized database is a no-op.

use sqlx::{Executor, PgPool};

use crate::domain::value_objects::SessionKind;
use crate::error::RateLimitResult;

const SESSIONS_SQL: &str = include_str!("../../sql/sessions.sql");
const RECORDS_AGGREGATED_SQL: &str = include_str!("../../sql/records_aggregated.sql");
const INDIVIDUAL_RECORDS_SQL: &str = include_str!("../../sql/individual_records.sql");

/// Advisory lock key serializing bootstrap across processes
const BOOTSTRAP_LOCK_KEY: i64 = 0x0072_6174_655f_6c69;

/// DDL for the counter table used by `kind`
pub fn counter_table_sql(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Aggregated => RECORDS_AGGREGATED_SQL,
        SessionKind::Individual => INDIVIDUAL_RECORDS_SQL,
    }
}

/// Create the schema, the sessions table and the counter table for `kind`
pub async fn bootstrap(pool: &PgPool, kind: SessionKind) -> RateLimitResult<()> {
    let mut tx = pool.begin().await?;

    // Concurrent CREATE ... IF NOT EXISTS can still race on the catalog
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(BOOTSTRAP_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    // Multi-statement DDL goes through the simple query protocol
    Executor::execute(&mut *tx, SESSIONS_SQL).await?;
    Executor::execute(&mut *tx, counter_table_sql(kind)).await?;

    tx.commit().await?;

    tracing::info!(session_type = %kind, "Rate limit schema bootstrapped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_table_sql() {
        assert!(counter_table_sql(SessionKind::Aggregated).contains("records_aggregated"));
        assert!(counter_table_sql(SessionKind::Individual).contains("individual_records"));
    }

    #[test]
    fn test_bootstrap_sql_is_idempotent() {
        for sql in [SESSIONS_SQL, RECORDS_AGGREGATED_SQL, INDIVIDUAL_RECORDS_SQL] {
            for statement in sql.split(';').map(str::trim).filter(|s| s.contains("CREATE")) {
                assert!(
                    statement.contains("IF NOT EXISTS"),
                    "non-idempotent statement: {statement}"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_bootstrap_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();

        for kind in [SessionKind::Aggregated, SessionKind::Individual] {
            let bootstrapping = bootstrap(&pool, kind);
            assert_send(&bootstrapping);
        }
    }

    #[test]
    fn test_counter_tables_cascade() {
        for kind in [SessionKind::Aggregated, SessionKind::Individual] {
            assert!(counter_table_sql(kind).contains("ON DELETE CASCADE"));
        }
    }
}
