//! SQLite database client implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::domain::{AppError, DatabaseError, NewTask, Task, TaskChanges, TaskId, TaskRepository};

const TASK_COLUMNS: &str = "id, name, done, created_at, updated_at";

/// SQLite connection pool configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub busy_timeout: Duration,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Turns the accepted `DATABASE_URL` spellings into a sqlx SQLite URL.
///
/// Remote libsql endpoints have no sqlx driver and are rejected.
pub fn normalize_database_url(database_url: &str) -> Result<String, DatabaseError> {
    let url = database_url.trim();
    const REMOTE_SCHEMES: [&str; 5] = ["libsql://", "http://", "https://", "ws://", "wss://"];
    if REMOTE_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        return Err(DatabaseError::Connection(format!(
            "remote database URLs are not supported: {url}"
        )));
    }

    if url == ":memory:" || url == "sqlite::memory:" {
        return Ok("sqlite::memory:".to_string());
    }
    if url.starts_with("sqlite:") {
        return Ok(url.to_string());
    }
    let path = url.strip_prefix("file:").unwrap_or(url);
    Ok(format!("sqlite://{path}"))
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// SQLite database client with connection pooling
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Create a new SQLite client with custom configuration.
    ///
    /// In-memory databases are pinned to one connection that never expires,
    /// otherwise every pooled connection would see its own empty database.
    pub async fn new(database_url: &str, config: SqliteConfig) -> Result<Self, AppError> {
        let url = normalize_database_url(database_url)?;
        let in_memory = is_in_memory(&url);

        let mut options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DatabaseError::Connection(e.to_string()))?
            .create_if_missing(true)
            .busy_timeout(config.busy_timeout);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .idle_timeout(config.idle_timeout)
                .max_lifetime(config.max_lifetime)
        };

        info!(in_memory, "Connecting to SQLite...");
        let pool = pool_options
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to SQLite");
        Ok(Self { pool })
    }

    /// Create a new SQLite client with default configuration
    pub async fn with_defaults(database_url: &str) -> Result<Self, AppError> {
        Self::new(database_url, SqliteConfig::default()).await
    }

    /// Run database migrations using sqlx migrate
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Migration(e.to_string())))?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_task(row: &SqliteRow) -> Result<Task, AppError> {
        let decode = |e: sqlx::Error| AppError::Database(DatabaseError::Query(e.to_string()));
        Ok(Task {
            id: row.try_get("id").map_err(decode)?,
            name: row.try_get("name").map_err(decode)?,
            done: row.try_get("done").map_err(decode)?,
            created_at: row.try_get("created_at").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
        })
    }
}

#[async_trait]
impl TaskRepository for SqliteClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let rows = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        rows.iter().map(Self::row_to_task).collect()
    }

    #[instrument(skip(self, data), fields(task_name = %data.name))]
    async fn create_task(&self, data: &NewTask) -> Result<Task, AppError> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tasks (name, done, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(data.done)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Self::row_to_task(&row)
    }

    #[instrument(skip(self))]
    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, AppError> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        row.as_ref().map(Self::row_to_task).transpose()
    }

    #[instrument(skip(self, changes))]
    async fn update_task(
        &self,
        id: TaskId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, AppError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE tasks
            SET name = COALESCE(?1, name),
                done = COALESCE(?2, done),
                updated_at = ?3
            WHERE id = ?4
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(changes.name.as_deref())
        .bind(changes.done)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if row.is_none() {
            warn!(task_id = id, "Update matched no task");
        }
        row.as_ref().map(Self::row_to_task).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: TaskId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_database_url() {
        assert_eq!(normalize_database_url("file:dev.db").unwrap(), "sqlite://dev.db");
        assert_eq!(normalize_database_url("dev.db").unwrap(), "sqlite://dev.db");
        assert_eq!(
            normalize_database_url("sqlite://dev.db").unwrap(),
            "sqlite://dev.db"
        );
        assert_eq!(
            normalize_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            normalize_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
    }

    #[test]
    fn test_normalize_rejects_remote_urls() {
        for url in [
            "libsql://tasks.turso.io",
            "http://127.0.0.1:8080",
            "https://db.example.com",
        ] {
            assert!(matches!(
                normalize_database_url(url),
                Err(DatabaseError::Connection(_))
            ));
        }
    }

    #[test]
    fn test_sqlite_config_default() {
        let config = SqliteConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }
}
