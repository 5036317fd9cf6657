pub mod schema;
pub mod sqlite;

use anyhow::{Context, Result};
use course_config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("invalid database url: {}", config.url))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens its own database.
        let in_memory = config.url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds));
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .max_lifetime(Duration::from_secs(1800))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("failed to connect to the database")?;
        debug!(url = %config.url, "database pool created");

        Ok(Self { pool })
    }

    /// A fresh private in-memory database, schema included.
    pub async fn in_memory() -> Result<Self> {
        let manager = Self::new(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connection_timeout_seconds: 5,
        })
        .await?;
        manager.migrate().await?;
        Ok(manager)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the tables and indexes that do not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("schema statement failed: {statement}"))?;
        }
        info!("database schema is up to date");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
