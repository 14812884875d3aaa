//! Request handlers for the task API.

use crate::AppState;
use crate::error::ApiError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use log::debug;
use serde::Deserialize;
use std::sync::Arc;
use taskdeck_core::{Priority, Task, TaskDraft, TaskId, TaskPatch};
use uuid::Uuid;

const USER_ID_REQUIRED: &str = "User ID is required";

/// Query parameters for listing tasks.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub priority: Option<String>,
}

/// GET /tasks — tasks owned by `userId`, newest first, optionally
/// filtered by priority.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let user_id = require_user_id(query.user_id.as_deref())?;
    let priority = parse_optional_priority(query.priority.as_deref())?;
    let tasks = state
        .store
        .list(user_id, priority)
        .map_err(|err| ApiError::storage("Failed to fetch tasks", err))?;
    debug!("fetched tasks (user_id={}, count={})", user_id, tasks.len());
    Ok(Json(tasks))
}

/// Body for creating a task.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub priority: Option<String>,
    pub user_id: Option<String>,
}

/// POST /tasks — create a task for `userId`.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = require_user_id(body.user_id.as_deref())?.to_string();
    let priority = parse_optional_priority(body.priority.as_deref())?.unwrap_or_default();
    let task = state
        .store
        .create(TaskDraft {
            title: body.title.unwrap_or_default(),
            priority,
            user_id,
        })
        .map_err(|err| ApiError::storage("Failed to create task", err))?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Body for updating a task. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
}

/// PUT /tasks/{id} — partial update of title/completed/priority.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let patch = TaskPatch {
        title: body.title,
        completed: body.completed,
        priority: parse_optional_priority(body.priority.as_deref())?,
    };
    match state
        .store
        .update(id, patch)
        .map_err(|err| ApiError::storage("Failed to update task", err))?
    {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::NotFound),
    }
}

/// DELETE /tasks/{id} — remove a task. Unknown ids are a no-op success.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let Ok(id) = Uuid::parse_str(&id) else {
        debug!("delete for unparseable task id");
        return Ok(StatusCode::NO_CONTENT);
    };
    state
        .store
        .delete(id)
        .map_err(|err| ApiError::storage("Failed to delete task", err))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Route not found")
}

/// Require a non-blank user id.
fn require_user_id(value: Option<&str>) -> Result<&str, ApiError> {
    match value {
        Some(user_id) if !user_id.trim().is_empty() => Ok(user_id),
        _ => Err(ApiError::InvalidRequest(USER_ID_REQUIRED.to_string())),
    }
}

/// Parse an optional priority, treating an empty string as absent (web
/// clients send `priority=""` for "All Priorities"). Unknown values are
/// rejected rather than coerced.
fn parse_optional_priority(value: Option<&str>) -> Result<Option<Priority>, ApiError> {
    match value {
        None | Some("") => Ok(None),
        Some(value) => Priority::parse(value)
            .map(Some)
            .ok_or_else(|| ApiError::InvalidRequest(format!("Unknown priority: {value}"))),
    }
}

/// Parse a path id. A value that is not a uuid identifies no record.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}
