use crate::core::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://pharmabill.db".to_string()),
            max_connections: super::env_or("DATABASE_MAX_CONNECTIONS", "5")?,
        })
    }

    /// An in-memory database lives only as long as its one connection
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Open (creating if needed) the SQLite database
    pub async fn create_pool(&self) -> Result<SqlitePool> {
        let mut options = SqliteConnectOptions::from_str(&self.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let mut pool = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(30));

        if self.is_in_memory() {
            pool = pool
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            pool = pool
                .max_connections(self.max_connections)
                .idle_timeout(Duration::from_secs(600));
        }

        pool.connect_with(options).await.map_err(AppError::Database)
    }
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
