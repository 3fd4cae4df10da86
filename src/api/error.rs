/// Structured API errors
///
/// Every handler returns `Result<_, ApiError>`. Errors render as
/// `{"error": <code>, "message": <text>}` with a matching status.

use crate::user::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid user id '{0}'")]
    InvalidId(String),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("user with ID = {0} not found")]
    NotFound(i64),
    #[error("no route for {0}")]
    RouteNotFound(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_) | ApiError::InvalidBody(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidId(_) => "invalid_id",
            ApiError::InvalidBody(_) => "invalid_body",
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) | ApiError::RouteNotFound(_) => "not_found",
            ApiError::Store(_) => "store_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            // store internals stay in the log
            ApiError::Store(e) => {
                tracing::error!("❌ Datastore operation failed: {:#}", e);
                "internal datastore error".to_string()
            }
            other => {
                tracing::warn!("Rejected request: {}", other);
                other.to_string()
            }
        };

        json_error(self.status(), self.code(), message)
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_renders_json() {
        let (status, body) = body_of(ApiError::NotFound(5)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "user with ID = 5 not found");
    }

    #[tokio::test]
    async fn store_error_hides_details() {
        let (status, body) = body_of(ApiError::Store(anyhow::anyhow!("disk on fire"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "store_error");
        assert_eq!(body["message"], "internal datastore error");
    }

    #[tokio::test]
    async fn validation_error_is_bad_request() {
        let (status, body) = body_of(ValidationError::EmptyField("email").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "email must not be empty");
    }
}
