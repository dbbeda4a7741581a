//! Owner-scoped task operations.
//!
//! Every method takes the authenticated username and only ever reads or writes
//! rows owned by it. A task that exists but belongs to someone else is reported
//! exactly like a task that does not exist.

use validator::Validate;

use crate::auth::CurrentUser;
use crate::db::{TaskFields, TaskStore};
use crate::error::AppError;
use crate::models::task::join_tags;
use crate::models::{Pagination, Task, TaskInput, TaskRow};

#[derive(Debug, Clone)]
pub struct TaskService {
    store: TaskStore,
}

impl TaskService {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Creates a task owned by `owner`. The new task is never completed.
    pub async fn create(&self, owner: &CurrentUser, input: TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        let fields = fields_from(&input);

        let row = self
            .store
            .insert(owner.username(), &fields)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;
        log::debug!("task {} created for {}", row.id, owner.username());
        Task::try_from(row)
    }

    pub async fn get(&self, owner: &CurrentUser, task_id: i64) -> Result<Task, AppError> {
        found(self.store.find(owner.username(), task_id).await?)
    }

    /// Replaces title, description, priority and tags. Completion and ownership
    /// are not touched.
    pub async fn update(
        &self,
        owner: &CurrentUser,
        task_id: i64,
        input: TaskInput,
    ) -> Result<Task, AppError> {
        input.validate()?;
        let fields = fields_from(&input);
        found(self.store.update(owner.username(), task_id, &fields).await?)
    }

    pub async fn set_completed(
        &self,
        owner: &CurrentUser,
        task_id: i64,
        completed: bool,
    ) -> Result<Task, AppError> {
        found(
            self.store
                .set_completed(owner.username(), task_id, completed)
                .await?,
        )
    }

    /// One page of the owner's tasks, ordered by id.
    pub async fn list(&self, owner: &CurrentUser, page: Pagination) -> Result<Vec<Task>, AppError> {
        page.validate()?;
        self.store
            .list(owner.username(), page.skip, page.limit)
            .await?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    pub async fn delete(&self, owner: &CurrentUser, task_id: i64) -> Result<(), AppError> {
        if self.store.delete(owner.username(), task_id).await? {
            log::debug!("task {} deleted by {}", task_id, owner.username());
            Ok(())
        } else {
            Err(task_not_found())
        }
    }
}

fn fields_from(input: &TaskInput) -> TaskFields<'_> {
    TaskFields {
        title: &input.title,
        description: input.description.as_deref(),
        priority: input.priority.unwrap_or_default(),
        tags: join_tags(input.tags.as_deref()),
    }
}

fn found(row: Option<TaskRow>) -> Result<Task, AppError> {
    row.ok_or_else(task_not_found).and_then(Task::try_from)
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}
