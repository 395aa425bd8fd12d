use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::{ValidationError, ValidationErrors};
use crate::errors::{AppError, FieldViolation, StorageError};

/// Body shared by every authentication failure so callers cannot tell the
/// variants apart.
pub const UNAUTHORIZED_DETAIL: &str = "Invalid credentials";

// The IntoResponse trait implementation converts AppError into a well-formed HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "detail": "Invalid input",
                    "errors": errors,
                })),
            )
                .into_response(),

            AppError::Auth(reason) => {
                tracing::warn!("Rejected unauthenticated request: {}", reason);
                (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(json!({ "detail": UNAUTHORIZED_DETAIL })),
                )
                    .into_response()
            }

            AppError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
            }

            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, Json(json!({ "detail": msg }))).into_response()
            }

            AppError::Storage(StorageError::Conflict(msg)) => {
                tracing::warn!("Store rejected write: {}", msg);
                (StatusCode::CONFLICT, Json(json!({ "detail": "Conflict" }))).into_response()
            }

            // The project was deleted while the write was in flight
            AppError::Storage(StorageError::MissingProject(id)) => {
                tracing::warn!("Store rejected task for missing project {}", id);
                AppError::not_found("Project").into_response()
            }

            // Storage and internal failures are logged here and never leak detail
            AppError::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                internal_error()
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal failure: {}", msg);
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Internal server error" })),
    )
        .into_response()
}

// Field errors keep the field name; schema-level errors name theirs in a `field` param.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| violation(&field, error))
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(violations)
    }
}

fn violation(field: &str, error: &ValidationError) -> FieldViolation {
    let field = error
        .params
        .get("field")
        .and_then(|value| value.as_str())
        .unwrap_or(field);
    let message = error
        .message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| error.code.to_string());
    FieldViolation::new(field, message)
}

// Extractor rejections are reported as validation errors (400), never 422.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid("query", rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::invalid("form", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid("path", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthError;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let error = AppError::Validation(vec![
            FieldViolation::new("datetimeEnd", "end must be >= start"),
        ]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body["detail"], "Invalid input");
        assert_eq!(body["errors"][0]["field"], "datetimeEnd");
        assert_eq!(body["errors"][0]["message"], "end must be >= start");
    }

    #[tokio::test]
    async fn test_auth_errors_share_one_body() {
        let variants = [
            AuthError::BadSignature,
            AuthError::Expired,
            AuthError::Malformed,
            AuthError::UnknownSubject,
            AuthError::InvalidCredentials,
        ];

        let mut bodies = Vec::new();
        for variant in variants {
            let response = AppError::Auth(variant).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
            bodies.push(to_bytes(response.into_body(), usize::MAX).await.unwrap());
        }
        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn test_storage_error_hides_detail() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let response = AppError::Storage(StorageError::Serialization(json_err)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body["detail"], "Internal server error");
    }

    #[tokio::test]
    async fn test_missing_project_is_not_found() {
        let error = AppError::Storage(StorageError::MissingProject(uuid::Uuid::nil()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await["detail"], "Project not found");
    }

    #[test]
    fn test_validation_errors_become_field_violations() {
        let mut errors = ValidationErrors::new();
        let mut email = ValidationError::new("email");
        email.message = Some("value is not a valid email address".into());
        errors.add("email", email);
        errors.add("name", ValidationError::new("blank"));

        match AppError::from(errors) {
            AppError::Validation(violations) => assert_eq!(
                violations,
                vec![
                    FieldViolation::new("email", "value is not a valid email address"),
                    FieldViolation::new("name", "blank"),
                ]
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_names_entity() {
        let response = AppError::not_found("Project").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await["detail"], "Project not found");
    }
}
