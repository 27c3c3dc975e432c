use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info};

use aqar_core::{
    delivery::DeliveryPort,
    listing::Listing,
    posting::{PostOutcome, PostStatus},
};

use crate::{app::AppState, error::ApiError};

fn validate(listing: &Listing) -> Result<(), ApiError> {
    listing.validate().map_err(|e| ApiError::Validation {
        field: e.field,
        message: e.message,
    })
}

/// Post one listing to its city channel.
pub async fn realestate(
    State(state): State<AppState>,
    Json(listing): Json<Listing>,
) -> Result<Json<PostOutcome>, ApiError> {
    validate(&listing)?;
    info!(listing = %listing.id, city_id = listing.city_id, "received listing webhook");
    Ok(Json(state.poster.post(&listing).await))
}

/// Post a batch. Every item gets its own outcome; failures stay isolated.
pub async fn realestate_batch(
    State(state): State<AppState>,
    Json(listings): Json<Vec<Listing>>,
) -> Result<Json<Vec<PostOutcome>>, ApiError> {
    for listing in &listings {
        validate(listing)?;
    }
    info!(count = listings.len(), "received listing batch");

    let mut outcomes = Vec::with_capacity(listings.len());
    for listing in &listings {
        outcomes.push(state.poster.post(listing).await);
    }
    Ok(Json(outcomes))
}

/// Fire-and-forget variant: respond immediately, log any posting failure.
pub async fn realestate_async(
    State(state): State<AppState>,
    Json(listing): Json<Listing>,
) -> Result<Json<PostOutcome>, ApiError> {
    validate(&listing)?;
    info!(listing = %listing.id, "queuing listing for background posting");

    let poster = state.poster.clone();
    tokio::spawn(async move {
        let outcome = poster.post(&listing).await;
        if outcome.status == PostStatus::Failed {
            error!(
                listing = %listing.id,
                message = %outcome.message,
                "background posting failed"
            );
        }
    });

    Ok(Json(PostOutcome::queued("queued for posting")))
}

/// Health status plus dependency checks.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let telegram_ok = state.delivery.health_check().await;
    let status = if telegram_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.cfg.environment,
        "timestamp": Utc::now(),
        "checks": {
            "telegram_bot": telegram_ok,
            "configuration": true,
        },
    }))
}

/// Liveness probe for container orchestration.
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

/// Readiness probe for load balancers.
pub async fn readiness() -> Json<Value> {
    Json(json!({ "status": "ready" }))
}
