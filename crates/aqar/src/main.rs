use std::sync::Arc;

use aqar_core::{
    config::Config,
    delivery::{DeliveryPort, RetryPolicy},
    formatting::formatter_for,
    posting::ListingPoster,
};
use aqar_server::{serve, AppState};
use aqar_telegram::TelegramDelivery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aqar_core::logging::init("aqar");

    let cfg = Arc::new(Config::load()?);
    tracing::info!(
        environment = %cfg.environment,
        channels = cfg.city_channels.len(),
        locale = ?cfg.locale,
        "starting aqar listing relay"
    );

    let delivery: Arc<dyn DeliveryPort> = Arc::new(TelegramDelivery::new(
        cfg.bot_token.clone(),
        RetryPolicy {
            max_attempts: cfg.max_retries,
            base_delay: cfg.retry_delay,
        },
    ));

    let poster = Arc::new(ListingPoster::new(
        cfg.city_channels.clone(),
        formatter_for(cfg.locale, cfg.max_description_length),
        delivery.clone(),
    ));

    serve(AppState {
        cfg,
        poster,
        delivery,
    })
    .await
}
