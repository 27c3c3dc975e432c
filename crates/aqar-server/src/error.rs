use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

/// HTTP-layer failures. Posting failures are not represented here; they are
/// reported inside the outcome body with a 200 status.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(&'static str),
    Validation { field: &'static str, message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.to_string())
            }
            ApiError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                format!("{field}: {message}"),
            ),
        };

        let body = json!({
            "error": error,
            "message": message,
            "timestamp": Utc::now(),
        });
        (status, Json(body)).into_response()
    }
}
