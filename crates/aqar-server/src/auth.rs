use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{app::AppState, error::ApiError};

const API_KEY_HEADER: &str = "x-api-key";

/// Webhook routes require the shared `X-Api-Key` header.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key == state.cfg.webhook_api_key => Ok(next.run(request).await),
        Some(_) => Err(ApiError::Unauthorized("invalid API key")),
        None => Err(ApiError::Unauthorized("missing API key")),
    }
}
