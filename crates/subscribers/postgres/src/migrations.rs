use sqlx::PgPool;

use crate::config::PostgresConfig;

/// Run database migrations, creating required tables if they do not exist.
///
/// This creates the subscribers table in the configured schema with the
/// configured table prefix.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let subscribers_table = config.subscribers_table();

    let create_subscribers = format!(
        "CREATE TABLE IF NOT EXISTS {subscribers_table} (
            id BIGSERIAL PRIMARY KEY,
            address TEXT UNIQUE NOT NULL,
            confirmed BOOLEAN NOT NULL DEFAULT FALSE,
            unsubscribed BOOLEAN NOT NULL DEFAULT FALSE,
            subscribed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );

    sqlx::query(&create_subscribers).execute(pool).await?;

    Ok(())
}
