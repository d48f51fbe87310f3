use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use hermod_subscribers::error::SubscriberError;
use hermod_subscribers::store::SubscriberStore;

use crate::config::PostgresConfig;
use crate::migrations;

/// PostgreSQL-backed implementation of [`SubscriberStore`].
///
/// Uses `sqlx::PgPool` for connection pooling. Subscription order comes from
/// a `BIGSERIAL` primary key, so `eligible_addresses` can order by `id`.
pub struct PostgresSubscriberStore {
    pool: PgPool,
    config: Arc<PostgresConfig>,
}

impl PostgresSubscriberStore {
    /// Create a new `PostgresSubscriberStore` from the provided configuration.
    ///
    /// Connects to `PostgreSQL`, creates the connection pool, and runs
    /// migrations to ensure the required tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriberError::Connection`] if pool creation fails, or
    /// [`SubscriberError::Backend`] if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, SubscriberError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.url)
            .await
            .map_err(|e| SubscriberError::Connection(e.to_string()))?;

        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| SubscriberError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    /// Create a `PostgresSubscriberStore` from an existing pool and config.
    ///
    /// This is useful when the application already manages a shared pool.
    /// Runs migrations on creation.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriberError::Backend`] if migrations fail.
    pub async fn from_pool(pool: PgPool, config: PostgresConfig) -> Result<Self, SubscriberError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| SubscriberError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }
}

#[async_trait]
impl SubscriberStore for PostgresSubscriberStore {
    async fn subscribe(&self, address: &str) -> Result<(), SubscriberError> {
        let table = self.config.subscribers_table();

        // Re-subscribing clears the unsubscribed flag; confirmation survives.
        let query = format!(
            "INSERT INTO {table} (address) VALUES ($1) \
             ON CONFLICT (address) DO UPDATE SET unsubscribed = FALSE"
        );

        sqlx::query(&query)
            .bind(address)
            .execute(&self.pool)
            .await
            .map_err(|e| SubscriberError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn confirm(&self, address: &str) -> Result<bool, SubscriberError> {
        let table = self.config.subscribers_table();

        let query = format!("UPDATE {table} SET confirmed = TRUE WHERE address = $1");

        let result = sqlx::query(&query)
            .bind(address)
            .execute(&self.pool)
            .await
            .map_err(|e| SubscriberError::Backend(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn unsubscribe(&self, address: &str) -> Result<bool, SubscriberError> {
        let table = self.config.subscribers_table();

        let query = format!("UPDATE {table} SET unsubscribed = TRUE WHERE address = $1");

        let result = sqlx::query(&query)
            .bind(address)
            .execute(&self.pool)
            .await
            .map_err(|e| SubscriberError::Backend(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn eligible_addresses(&self) -> Result<Vec<String>, SubscriberError> {
        let table = self.config.subscribers_table();

        let query =
            format!("SELECT address FROM {table} WHERE confirmed AND NOT unsubscribed ORDER BY id");

        let rows: Vec<(String,)> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SubscriberError::Backend(e.to_string()))?;

        Ok(rows.into_iter().map(|(address,)| address).collect())
    }

    async fn active_count(&self) -> Result<u64, SubscriberError> {
        let table = self.config.subscribers_table();

        let query = format!("SELECT COUNT(*) FROM {table} WHERE NOT unsubscribed");

        let (count,): (i64,) = sqlx::query_as(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SubscriberError::Backend(e.to_string()))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
