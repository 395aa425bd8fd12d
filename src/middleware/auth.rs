use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use crate::errors::{AppError, AuthError};
use crate::models::UserIdentity;
use crate::state::AppState;

/// The authenticated caller of a protected route.
///
/// Extracting it takes the token from the `Authorization: Bearer` header and
/// hands it to `AuthGateway::resolve_caller`. Handlers list it as their first
/// argument so no business logic runs for an unauthenticated request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Auth(AuthError::Malformed))?;

        let caller = state.auth.resolve_caller(bearer.token()).await?;
        Ok(CurrentUser(caller))
    }
}
