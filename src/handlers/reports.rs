use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use std::collections::{HashMap, HashSet};
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{ReportQuery, TaskFilter, UserIdentity};
use crate::report::{
    build_timeline, project_totals, render_gantt, summarize_by_project, LabeledInterval,
    ProjectTotal, ReportWindow, TaskInterval, TimelineEntry,
};
use crate::state::AppState;

const NO_TASKS: &str = "No tasks found for this user";

/// Total tracked seconds per project over tasks fully inside the window.
pub async fn get_report(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ReportQuery>, AppError>,
) -> AppResult<Json<Vec<ProjectTotal>>> {
    let window = ReportWindow::new(query.datetime_start, query.datetime_end)?;

    let filter = TaskFilter {
        user_id: None,
        start_from: Some(window.start()),
        end_until: Some(window.end()),
    };
    let tasks = state.store.query_tasks(&filter).await?;

    // Inner join: tasks whose project is gone are not reported
    let live_projects: HashSet<_> = state
        .store
        .list_projects()
        .await?
        .into_iter()
        .map(|project| project.id)
        .collect();

    let intervals = tasks
        .iter()
        .filter(|task| live_projects.contains(&task.project_id))
        .map(TaskInterval::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|violation| {
            AppError::Internal(format!(
                "stored task violates interval invariant: {}",
                violation.message
            ))
        })?;

    let totals = project_totals(summarize_by_project(&intervals, &window));
    tracing::info!(
        "Report for {} over [{}, {}]: {} projects",
        caller.email,
        window.start(),
        window.end(),
        totals.len()
    );
    Ok(Json(totals))
}

// Helper function to load the caller's tasks joined with their project names
async fn caller_timeline(state: &AppState, caller: &UserIdentity) -> AppResult<Vec<TimelineEntry>> {
    let filter = TaskFilter {
        user_id: Some(caller.id),
        ..Default::default()
    };
    let tasks = state.store.query_tasks(&filter).await?;

    let project_names: HashMap<_, _> = state
        .store
        .list_projects()
        .await?
        .into_iter()
        .map(|project| (project.id, project.name))
        .collect();

    let labeled: Vec<LabeledInterval> = tasks
        .into_iter()
        .filter_map(|task| {
            let project_name = project_names.get(&task.project_id)?.clone();
            Some(LabeledInterval {
                activity: task.activity,
                project_name,
                start: task.start_time,
                end: task.end_time,
            })
        })
        .collect();

    if labeled.is_empty() {
        tracing::debug!("No tasks found for user {}", caller.email);
        return Err(AppError::NotFound(NO_TASKS.into()));
    }

    build_timeline(&labeled)
}

pub async fn get_timeline(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TimelineEntry>>> {
    let entries = caller_timeline(&state, &caller).await?;
    tracing::info!("Timeline for {}: {} entries", caller.email, entries.len());
    Ok(Json(entries))
}

pub async fn get_gantt(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let entries = caller_timeline(&state, &caller).await?;
    let svg = render_gantt(&format!("Gantt chart for {}", caller.email), &entries)?;

    tracing::info!("Rendered Gantt chart for {}", caller.email);
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
