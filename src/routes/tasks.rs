use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{CompletionInput, Pagination, TaskInput},
    tasks::TaskService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `skip` (optional, default 0): number of tasks to skip, `>= 0`.
/// - `limit` (optional, default 10): page size, between 1 and 100.
///
/// Tasks are ordered by id, so consecutive pages never overlap.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    user: CurrentUser,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(&user, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// The owner is always the caller; the body cannot name one.
///
/// ## Request Body:
/// - `title`: required, 1 to 200 characters.
/// - `description` (optional).
/// - `priority` (optional): `low`, `medium` (default) or `high`.
/// - `tags` (optional): list of non-empty strings without commas.
///
/// ## Responses:
/// - `200 OK`: the created task, `completed` is false.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: invalid body, including an unknown priority.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    user: CurrentUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(&user, task_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Retrieves one task. `404` when it does not exist or belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    user: CurrentUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(&user, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates title, description, priority and tags of a task.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `404 Not Found`: the task does not exist or is not owned by the caller.
/// - `422 Unprocessable Entity`: invalid body.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    user: CurrentUser,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update(&user, task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Marks a task complete or incomplete.
#[patch("/{id}/completion")]
pub async fn set_completion(
    tasks: web::Data<TaskService>,
    user: CurrentUser,
    task_id: web::Path<i64>,
    body: web::Json<CompletionInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .set_completed(&user, task_id.into_inner(), body.completed)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task owned by the caller.
///
/// ## Responses:
/// - `200 OK`: `{"detail": "Task deleted successfully"}`.
/// - `404 Not Found`: the task does not exist or is not owned by the caller.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    user: CurrentUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    tasks.delete(&user, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "detail": "Task deleted successfully" })))
}
