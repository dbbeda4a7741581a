use crate::db::Database;
use crate::error::AppError;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, username, password, full_name, email, avatar, bio";

/// Credential store over the `users` table.
#[derive(Debug, Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
        self.db
            .run(
                sqlx::query_as::<_, User>(&sql)
                    .bind(username)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    pub async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let row: Option<(i64,)> = self
            .db
            .run(
                sqlx::query_as("SELECT id FROM users WHERE username = ?")
                    .bind(username)
                    .fetch_optional(self.db.pool()),
            )
            .await?;
        Ok(row.is_some())
    }

    /// Inserts a user. A taken username surfaces as `AppError::Conflict`.
    pub async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, password, full_name, email, avatar, bio)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {}",
            USER_COLUMNS
        );
        self.db
            .run(
                sqlx::query_as::<_, User>(&sql)
                    .bind(&user.username)
                    .bind(&user.password_hash)
                    .bind(&user.full_name)
                    .bind(&user.email)
                    .bind(&user.avatar)
                    .bind(&user.bio)
                    .fetch_one(self.db.pool()),
            )
            .await
    }
}
