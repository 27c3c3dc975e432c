use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use aqar_core::{config::Config, delivery::DeliveryPort, posting::ListingPoster};

use crate::{auth::require_api_key, handlers};

/// Shared application state, owned by the composition root.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub poster: Arc<ListingPoster>,
    pub delivery: Arc<dyn DeliveryPort>,
}

pub fn build_router(state: AppState) -> Router {
    let webhook = Router::new()
        .route("/realestate", post(handlers::realestate))
        .route("/realestate/batch", post(handlers::realestate_batch))
        .route("/realestate/async", post(handlers::realestate_async))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let health = Router::new()
        .route("/", get(handlers::health))
        .route("/live", get(handlers::liveness))
        .route("/ready", get(handlers::readiness));

    Router::new()
        .nest("/api/v1/webhook", webhook)
        .nest("/api/v1/health", health)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.cfg.bind_addr;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
