use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use course_errors::CourseError;
use serde_json::json;
use tracing::error;

use crate::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Course(#[from] CourseError),

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("forbidden")]
    Forbidden,

    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, &'static str) {
        match self {
            ApiError::Course(err) if err.is_not_found() => {
                (StatusCode::NOT_FOUND, err.to_string(), "NOT_FOUND")
            }
            ApiError::Course(CourseError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone(), "VALIDATION_ERROR")
            }
            ApiError::Course(CourseError::Conflict(msg)) => {
                (StatusCode::CONFLICT, msg.clone(), "CONFLICT")
            }
            ApiError::Course(CourseError::Permission(msg)) => {
                (StatusCode::FORBIDDEN, msg.clone(), "FORBIDDEN")
            }
            ApiError::Course(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.user_message().to_string(),
                "INTERNAL_ERROR",
            ),
            ApiError::Validation(errors) => {
                let mut details: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .map(|(field, errors)| {
                        let messages: Vec<String> = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        format!("{}: {}", field, messages.join(", "))
                    })
                    .collect();
                details.sort();
                (
                    StatusCode::BAD_REQUEST,
                    details.join("; "),
                    "VALIDATION_ERROR",
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "BAD_REQUEST"),
            ApiError::Authentication(err) => {
                (StatusCode::UNAUTHORIZED, err.to_string(), "AUTHENTICATION_ERROR")
            }
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You are not allowed to perform this action".to_string(),
                "FORBIDDEN",
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "INTERNAL_ERROR",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error_type) = self.parts();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_type,
                "code": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
