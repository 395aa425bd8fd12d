//! Project and task time-tracking API.
//!
//! Users log in for a stateless bearer token, record time spent on projects
//! and request aggregate reports and timelines.

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod report;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub use state::AppState;

/// Create the router with all routes. Every route except login resolves the
/// caller from its bearer token before doing anything else.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // Auth routes
        .route("/auth/login", post(handlers::handle_login))

        // User routes
        .route("/users", post(handlers::create_user))
        .route("/users/:user_id", get(handlers::get_user))

        // Project routes
        .route("/projects", post(handlers::create_project).get(handlers::list_projects))
        .route(
            "/projects/:project_id",
            get(handlers::get_project).delete(handlers::delete_project),
        )

        // Task routes
        .route("/tasks", post(handlers::create_task).get(handlers::list_tasks))
        .route(
            "/tasks/:task_id",
            get(handlers::get_task)
                .put(handlers::replace_task)
                .patch(handlers::replace_task)
                .delete(handlers::delete_task),
        )

        // Report routes
        .route("/report", get(handlers::get_report))
        .route("/report/timeline", get(handlers::get_timeline))
        .route("/report/gantt", get(handlers::get_gantt))

        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}
