use axum::{extract::State, Form, Json};
use axum_extra::extract::WithRejection;
use crate::errors::{AppError, AppResult};
use crate::models::{LoginForm, TokenResponse};
use crate::state::AppState;

pub async fn handle_login(
    State(state): State<AppState>,
    WithRejection(Form(login_form), _): WithRejection<Form<LoginForm>, AppError>,
) -> AppResult<Json<TokenResponse>> {
    tracing::info!("Login attempt for user: {}", login_form.username);

    let token = state
        .auth
        .login(&login_form.username, &login_form.password)
        .await?;

    Ok(Json(TokenResponse::bearer(token)))
}
