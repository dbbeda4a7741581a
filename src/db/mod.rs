//! Persistent storage on SQLite through `sqlx`.
//!
//! `Database` owns the connection pool and the timeout applied to every storage
//! call. `UserStore` and `TaskStore` are thin query layers on top of it.

pub mod tasks;
pub mod users;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

pub use tasks::{TaskFields, TaskStore};
pub use users::UserStore;

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        full_name TEXT,
        email TEXT,
        avatar TEXT,
        bio TEXT
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT 0,
        priority TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
        tags TEXT,
        owner_id INTEGER NOT NULL REFERENCES users(id),
        owner_username TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_tasks_owner_username ON tasks(owner_username)",
];

/// Connection pool plus the upper bound for any single storage call.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    timeout: Duration,
}

impl Database {
    /// Opens a pool for `url`.
    ///
    /// In-memory databases live and die with their connection, so they are pinned
    /// to one connection that is never reaped.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(timeout);
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        log::info!("connected to {}", redact(url));

        Ok(Self { pool, timeout })
    }

    /// Creates the `users` and `tasks` tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            self.run(sqlx::query(statement).execute(&self.pool)).await?;
        }
        log::debug!("schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Awaits a storage call, failing with `DatabaseError` once the timeout elapses.
    pub(crate) async fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => {
                log::warn!("storage call exceeded {:?}", self.timeout);
                Err(AppError::DatabaseError(format!(
                    "storage call timed out after {:?}",
                    self.timeout
                )))
            }
        }
    }
}

// Drops query parameters, which may carry credentials for other backends.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
