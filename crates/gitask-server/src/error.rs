use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gitask_engine::AskError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "ok": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<AskError> for ApiError {
    fn from(error: AskError) -> Self {
        let message = error.to_string();
        match error {
            AskError::NotAuthenticated => ApiError::Unauthorized(message),
            AskError::MissingQuestion => ApiError::BadRequest(message),
            AskError::Failed(_) => ApiError::Internal(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
