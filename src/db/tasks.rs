use crate::db::Database;
use crate::error::AppError;
use crate::models::{TaskPriority, TaskRow};

const TASK_COLUMNS: &str =
    "id, title, description, completed, priority, tags, owner_id, owner_username";

/// Column values written by create and update. `tags` is already in storage form.
#[derive(Debug)]
pub struct TaskFields<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub priority: TaskPriority,
    pub tags: Option<String>,
}

/// Task store over the `tasks` table. Every query is filtered by `owner_username`.
#[derive(Debug, Clone)]
pub struct TaskStore {
    db: Database,
}

impl TaskStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts a task owned by `owner`, copying the owner's id from `users`.
    ///
    /// Returns `None` when no user named `owner` exists.
    pub async fn insert(
        &self,
        owner: &str,
        fields: &TaskFields<'_>,
    ) -> Result<Option<TaskRow>, AppError> {
        let sql = format!(
            "INSERT INTO tasks (title, description, completed, priority, tags, owner_id, owner_username)
             SELECT ?, ?, 0, ?, ?, id, username FROM users WHERE username = ?
             RETURNING {}",
            TASK_COLUMNS
        );
        self.db
            .run(
                sqlx::query_as::<_, TaskRow>(&sql)
                    .bind(fields.title)
                    .bind(fields.description)
                    .bind(fields.priority.as_str())
                    .bind(&fields.tags)
                    .bind(owner)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    pub async fn find(&self, owner: &str, id: i64) -> Result<Option<TaskRow>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = ? AND owner_username = ?",
            TASK_COLUMNS
        );
        self.db
            .run(
                sqlx::query_as::<_, TaskRow>(&sql)
                    .bind(id)
                    .bind(owner)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    /// Owner's tasks in ascending id order.
    pub async fn list(&self, owner: &str, skip: i64, limit: i64) -> Result<Vec<TaskRow>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE owner_username = ? ORDER BY id ASC LIMIT ? OFFSET ?",
            TASK_COLUMNS
        );
        self.db
            .run(
                sqlx::query_as::<_, TaskRow>(&sql)
                    .bind(owner)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(self.db.pool()),
            )
            .await
    }

    /// Replaces the editable fields. `completed` and ownership are left alone.
    pub async fn update(
        &self,
        owner: &str,
        id: i64,
        fields: &TaskFields<'_>,
    ) -> Result<Option<TaskRow>, AppError> {
        let sql = format!(
            "UPDATE tasks SET title = ?, description = ?, priority = ?, tags = ?
             WHERE id = ? AND owner_username = ?
             RETURNING {}",
            TASK_COLUMNS
        );
        self.db
            .run(
                sqlx::query_as::<_, TaskRow>(&sql)
                    .bind(fields.title)
                    .bind(fields.description)
                    .bind(fields.priority.as_str())
                    .bind(&fields.tags)
                    .bind(id)
                    .bind(owner)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    pub async fn set_completed(
        &self,
        owner: &str,
        id: i64,
        completed: bool,
    ) -> Result<Option<TaskRow>, AppError> {
        let sql = format!(
            "UPDATE tasks SET completed = ? WHERE id = ? AND owner_username = ? RETURNING {}",
            TASK_COLUMNS
        );
        self.db
            .run(
                sqlx::query_as::<_, TaskRow>(&sql)
                    .bind(completed)
                    .bind(id)
                    .bind(owner)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, owner: &str, id: i64) -> Result<bool, AppError> {
        let result = self
            .db
            .run(
                sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_username = ?")
                    .bind(id)
                    .bind(owner)
                    .execute(self.db.pool()),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
