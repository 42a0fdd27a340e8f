use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Request-level error; every variant is terminal for the request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database not available")]
    Unavailable,

    #[error("Email already registered")]
    Conflict,

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => ApiError::Conflict,
            other => ApiError::Store(other),
        }
    }
}

// Extractor rejections carry serde's message; log it, answer with a short one.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(status = %rejection.status(), reason = %rejection.body_text(), "rejected request body");
        ApiError::BadRequest("Invalid request body")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(reason = %rejection.body_text(), "rejected query string");
        ApiError::BadRequest("Invalid query parameters")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
            // Duplicate signups answer like any other rejected payload.
            ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store error");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Collection;

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::Unavailable, StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Conflict, StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("User not found"), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("Invalid plan"), StatusCode::BAD_REQUEST),
            (
                ApiError::Store(StoreError::NotAnObject),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn duplicate_maps_to_conflict() {
        let err = ApiError::from(StoreError::Duplicate(Collection::User));
        assert!(matches!(err, ApiError::Conflict));
        assert_eq!(err.to_string(), "Email already registered");
    }
}
