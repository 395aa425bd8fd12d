use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;
use crate::errors::{AppError, AppResult, StorageError};
use crate::middleware::CurrentUser;
use crate::models::{User, UserCreate, UserOut};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "Email already registered";

pub async fn create_user(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<UserCreate>, AppError>,
) -> AppResult<(StatusCode, Json<UserOut>)> {
    input.validate()?;

    if state.store.find_user_by_email(&input.email).await?.is_some() {
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }

    let user = User {
        id: Uuid::new_v4(),
        email: input.email,
        password_hash: state.auth.hasher().hash(&input.password)?,
    };

    // A concurrent registration can still win the race; the store's
    // uniqueness check is authoritative.
    state.store.insert_user(&user).await.map_err(|e| match e {
        StorageError::Conflict(_) => AppError::Conflict(EMAIL_TAKEN.into()),
        other => AppError::Storage(other),
    })?;

    tracing::info!("User {} created by {}", user.email, caller.email);
    Ok((StatusCode::CREATED, Json(UserOut::from(&user))))
}

pub async fn get_user(
    CurrentUser(_caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<UserOut>> {
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(Json(UserOut::from(&user)))
}
