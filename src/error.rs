use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type for board API responses.
///
/// Upstream failures never reach this type — the gateway converts them to
/// defaults — so only genuinely broken requests surface here.
#[derive(Debug)]
pub enum BoardError {
    BadRequest(String),
    Unauthorized,
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
            Self::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

impl std::error::Error for BoardError {}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let (status, error_str) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
        };

        let body = json!({ "error": error_str });
        (status, axum::Json(body)).into_response()
    }
}
