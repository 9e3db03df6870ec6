//! Database engine - a PostgreSQL connection pool built from [`DatabaseConfig`].
//!
//! Uses sqlx PgPool with explicit connection limits.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::dsn::DatabaseUrl;
use crate::error::DbError;

/// Pool of database connections plus the URL it was built from.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct Engine {
    pool: PgPool,
    url: DatabaseUrl,
}

impl Engine {
    /// Build an engine without touching the network.
    ///
    /// Connections are opened on first use. Fails only when the driver
    /// rejects the connection string.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &DatabaseConfig) -> Result<Self, DbError> {
        let options = connect_options(&config.url)?;
        let pool = pool_options(config).connect_lazy_with(options);

        info!(
            url = %config.url,
            max_connections = config.max_connections,
            "database engine created"
        );

        Ok(Self {
            pool,
            url: config.url.clone(),
        })
    }

    /// Build an engine and prove connectivity by opening one connection.
    ///
    /// The first connection is opened directly, not through the pool, so a
    /// refused or rejected connection is reported at once with its cause
    /// instead of being retried until `acquire_timeout`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = DatabaseConfig::from_env()?;
    /// let engine = Engine::connect(&config).await?;
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let options = connect_options(&config.url)?;
        PgConnection::connect_with(&options).await?.close().await?;
        let pool = pool_options(config).connect_lazy_with(options);

        info!(url = %config.url, "database engine connected");

        Ok(Self {
            pool,
            url: config.url.clone(),
        })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool, url: DatabaseUrl) -> Self {
        Self { pool, url }
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), DbError> {
        let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Close all connections; waits for checked-out ones to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        info!(url = %self.url, "database engine closed");
    }
}

fn connect_options(url: &DatabaseUrl) -> Result<PgConnectOptions, DbError> {
    Ok(PgConnectOptions::from_str(&url.connect_str())?)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig::new(DatabaseUrl::parse(url).unwrap())
    }

    #[tokio::test]
    async fn lazy_engine_does_not_connect() {
        // Nothing listens here; construction must still succeed.
        let engine = Engine::new(&config("postgresql://u:p@127.0.0.1:1/todo")).unwrap();
        assert!(!engine.is_closed());
        assert_eq!(engine.pool().size(), 0);
    }

    #[tokio::test]
    async fn engine_accepts_driver_suffixed_urls() {
        let engine = Engine::new(&config("postgresql+psycopg2://u:p@127.0.0.1:1/todo")).unwrap();
        assert_eq!(engine.url().as_str(), "postgresql+psycopg2://u:p@127.0.0.1:1/todo");
    }

    #[tokio::test]
    async fn close_marks_engine_closed() {
        let engine = Engine::new(&config("postgres://127.0.0.1:1/todo")).unwrap();
        engine.close().await;
        assert!(engine.is_closed());
    }

    #[tokio::test]
    async fn connect_reports_refused_connection_without_waiting() {
        // Nothing listens here; the acquire timeout must not come into play.
        let mut config = config("postgresql://u:p@127.0.0.1:1/todo");
        config.acquire_timeout = Duration::from_secs(30);

        let result = tokio::time::timeout(Duration::from_secs(10), Engine::connect(&config))
            .await
            .expect("connect should fail before the timeout");

        match result {
            Err(DbError::Sqlx(sqlx::Error::Io(_))) => {}
            other => panic!("expected an I/O error, got {:?}", other.map(|_| ())),
        }
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p todoctl-core -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connect_and_ping() {
        let config = DatabaseConfig::from_env().expect("DATABASE_URL required");
        let engine = Engine::connect(&config).await.expect("connect failed");
        engine.ping().await.expect("ping failed");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let config = DatabaseConfig::from_env().expect("DATABASE_URL required");
        let engine = Engine::connect(&config).await.expect("connect failed");

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let pool = engine.pool().clone();
                tokio::spawn(async move {
                    let result: (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
    }
}
