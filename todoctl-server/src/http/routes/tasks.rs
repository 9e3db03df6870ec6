//! Task endpoints
//!
//! Paths accept an optional trailing slash (`/api/tasks/` and `/api/tasks`).
//! Input is validated before a session is opened.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use todoctl_core::{Task, TaskRepo, TaskTitle};

use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidTaskId};
use crate::state::AppState;

/// Create/replace task request
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// GET /api/tasks/ - list all tasks
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let mut session = state.sessions().session().await?;
    let tasks = TaskRepo::new(session.conn()).list().await?;
    session.commit().await?;
    Ok(Json(tasks))
}

/// POST /api/tasks/ - create a task
async fn create_task(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<TaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let title = TaskTitle::new(&req.title)?;

    let mut session = state.sessions().session().await?;
    let task = TaskRepo::new(session.conn())
        .create(&title, req.completed)
        .await?;
    session.commit().await?;

    tracing::info!(task_id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks/{id}/ - get a single task
async fn get_task(
    State(state): State<AppState>,
    ValidTaskId(id): ValidTaskId,
) -> Result<Json<Task>, ApiError> {
    let mut session = state.sessions().session().await?;
    let task = TaskRepo::new(session.conn()).get(id).await?;
    session.commit().await?;
    Ok(Json(task))
}

/// PUT /api/tasks/{id}/ - replace title and completion state
async fn update_task(
    State(state): State<AppState>,
    ValidTaskId(id): ValidTaskId,
    ValidJson(req): ValidJson<TaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let title = TaskTitle::new(&req.title)?;

    let mut session = state.sessions().session().await?;
    let task = TaskRepo::new(session.conn())
        .update(id, &title, req.completed)
        .await?;
    session.commit().await?;

    tracing::info!(task_id = id, completed = task.completed, "task updated");
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}/ - delete a task
async fn delete_task(
    State(state): State<AppState>,
    ValidTaskId(id): ValidTaskId,
) -> Result<StatusCode, ApiError> {
    let mut session = state.sessions().session().await?;
    TaskRepo::new(session.conn()).delete(id).await?;
    session.commit().await?;

    tracing::info!(task_id = id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Task routes
pub fn router() -> Router<AppState> {
    let collection = get(list_tasks).post(create_task);
    let item = get(get_task).put(update_task).delete(delete_task);

    Router::new()
        .route("/api/tasks", collection.clone())
        .route("/api/tasks/", collection)
        .route("/api/tasks/{id}", item.clone())
        .route("/api/tasks/{id}/", item)
}
