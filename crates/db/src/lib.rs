//! PostgreSQL persistence for the milestone tracker.
//!
//! The in-memory [`LedgerState`](tracker_core::state::LedgerState) is
//! authoritative while the server runs; this crate loads it at startup and
//! writes every successful mutation through via
//! [`LedgerStateRepo`](repositories::LedgerStateRepo).

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Store an unsigned value in a BIGINT column, bit for bit.
pub(crate) fn to_db(value: u64) -> i64 {
    value as i64
}

/// Read back a value written by [`to_db`].
pub(crate) fn from_db(value: i64) -> u64 {
    value as u64
}

pub(crate) fn decode_error(message: String) -> sqlx::Error {
    sqlx::Error::Decode(message.into())
}

pub(crate) fn encode_error(message: String) -> sqlx::Error {
    sqlx::Error::Encode(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_values_survive_bigint_storage() {
        for value in [0, 1, i64::MAX as u64, u64::MAX] {
            assert_eq!(from_db(to_db(value)), value);
        }
        assert_eq!(to_db(u64::MAX), -1);
    }
}
