use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{Project, ProjectCreate};
use crate::state::AppState;

pub async fn create_project(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<ProjectCreate>, AppError>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;

    let project = Project {
        id: Uuid::new_v4(),
        name: input.name,
    };
    state.store.insert_project(&project).await?;

    tracing::info!("Project {} created by {}", project.id, caller.email);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects(
    CurrentUser(_caller): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = state.store.list_projects().await?;
    tracing::debug!("Listing {} projects", projects.len());
    Ok(Json(projects))
}

pub async fn get_project(
    CurrentUser(_caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(project_id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<Project>> {
    let project = state
        .store
        .find_project(project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project"))?;

    Ok(Json(project))
}

/// Deletes the project together with all of its tasks.
pub async fn delete_project(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(project_id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<StatusCode> {
    if !state.store.delete_project(project_id).await? {
        return Err(AppError::not_found("Project"));
    }

    tracing::info!("Project {} deleted by {}", project_id, caller.email);
    Ok(StatusCode::NO_CONTENT)
}
