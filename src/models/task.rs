use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Represents the priority of a task.
/// Stored as lowercase text in the `priority` column.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority, used when the client sends none.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(AppError::ValidationError(format!(
                "priority must be one of low, medium, high (got {:?})",
                other
            ))),
        }
    }
}

/// Input structure for creating or updating a task.
///
/// Ownership and completion are deliberately absent: the owner always comes from
/// the authenticated caller and completion has its own endpoint.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// The priority of the task. Defaults to medium when absent or null.
    #[serde(default)]
    pub priority: Option<TaskPriority>,

    /// Optional tags. Each tag must be non-empty and free of commas.
    #[serde(default)]
    #[validate(custom = "validate_tags")]
    pub tags: Option<Vec<String>>,
}

/// Body of `PATCH /tasks/{id}/completion`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionInput {
    pub completed: bool,
}

/// Pagination for listing tasks (`?skip=&limit=`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct Pagination {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "Pagination::default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 10;

    fn default_limit() -> i64 {
        Self::DEFAULT_LIMIT
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// A row of the `tasks` table, tags still in their stored comma-joined form.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: String,
    pub tags: Option<String>,
    pub owner_id: i64,
    pub owner_username: String,
}

/// Represents a task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub tags: Vec<String>,
    pub completed: bool,
    pub owner_id: i64,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let priority: TaskPriority = row.priority.parse().map_err(|_| {
            AppError::DatabaseError(format!(
                "task {} has unknown priority {:?}",
                row.id, row.priority
            ))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            priority,
            tags: split_tags(row.tags.as_deref()),
            completed: row.completed,
            owner_id: row.owner_id,
        })
    }
}

/// Joins tags into their stored form. An empty or absent list is stored as NULL.
pub fn join_tags(tags: Option<&[String]>) -> Option<String> {
    match tags {
        Some(tags) if !tags.is_empty() => Some(tags.join(",")),
        _ => None,
    }
}

/// Splits a stored tag string back into a list.
pub fn split_tags(stored: Option<&str>) -> Vec<String> {
    match stored {
        Some(s) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

// Tags are persisted comma-joined, so a comma or an empty tag would not survive a read.
fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    for tag in tags {
        if tag.is_empty() {
            return Err(ValidationError::new("empty_tag"));
        }
        if tag.contains(',') {
            return Err(ValidationError::new("tag_contains_comma"));
        }
    }
    Ok(())
}
