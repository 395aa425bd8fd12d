use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{TaskFilter, TaskInput, TaskOut, TaskQuery};
use crate::state::AppState;

// Helper function to check that the project and user a task points at exist.
// The store checks the project again under its own write.
async fn ensure_references(state: &AppState, input: &TaskInput) -> AppResult<()> {
    if state.store.find_project(input.project).await?.is_none() {
        tracing::warn!("Task references missing project: {}", input.project);
        return Err(AppError::not_found("Project"));
    }
    if state.store.find_user(input.user).await?.is_none() {
        tracing::warn!("Task references missing user: {}", input.user);
        return Err(AppError::not_found("User"));
    }
    Ok(())
}

pub async fn create_task(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<TaskInput>, AppError>,
) -> AppResult<(StatusCode, Json<TaskOut>)> {
    input.validate()?;
    ensure_references(&state, &input).await?;

    let task = input.into_task(Uuid::new_v4());
    state.store.insert_task(&task).await?;

    tracing::info!("Task {} created by {}", task.id, caller.email);
    Ok((StatusCode::CREATED, Json(TaskOut::from(task))))
}

pub async fn list_tasks(
    CurrentUser(_caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<TaskQuery>, AppError>,
) -> AppResult<Json<Vec<TaskOut>>> {
    let filter = TaskFilter {
        user_id: None,
        start_from: query.datetime_start,
        end_until: query.datetime_end,
    };

    let tasks = state.store.query_tasks(&filter).await?;
    tracing::debug!("Found {} tasks for filter {:?}", tasks.len(), filter);
    Ok(Json(tasks.into_iter().map(TaskOut::from).collect()))
}

pub async fn get_task(
    CurrentUser(_caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(task_id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<TaskOut>> {
    let task = state
        .store
        .find_task(task_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task"))?;

    Ok(Json(TaskOut::from(task)))
}

/// Serves both `PUT` and `PATCH`: every field of the task is replaced.
pub async fn replace_task(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(task_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<TaskInput>, AppError>,
) -> AppResult<Json<TaskOut>> {
    if state.store.find_task(task_id).await?.is_none() {
        return Err(AppError::not_found("Task"));
    }
    input.validate()?;
    ensure_references(&state, &input).await?;

    let task = input.into_task(task_id);
    if !state.store.update_task(&task).await? {
        // Deleted between the lookup and the write.
        return Err(AppError::not_found("Task"));
    }

    tracing::info!("Task {} replaced by {}", task_id, caller.email);
    Ok(Json(TaskOut::from(task)))
}

pub async fn delete_task(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(task_id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<StatusCode> {
    if !state.store.delete_task(task_id).await? {
        return Err(AppError::not_found("Task"));
    }

    tracing::info!("Task {} deleted by {}", task_id, caller.email);
    Ok(StatusCode::NO_CONTENT)
}
