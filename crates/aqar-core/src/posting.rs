use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    channels::ChannelMap,
    delivery::DeliveryPort,
    domain::{ChannelId, MessageId},
    errors::Error,
    formatting::ListingFormatter,
    listing::Listing,
};

/// Terminal state of one posting attempt sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Posted,
    Skipped,
    Failed,
    Queued,
}

/// What happened to one listing. Produced once, never mutated.
#[derive(Clone, Debug, Serialize)]
pub struct PostOutcome {
    pub status: PostStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    pub timestamp: DateTime<Utc>,
}

impl PostOutcome {
    fn new(
        status: PostStatus,
        message: impl Into<String>,
        message_id: Option<MessageId>,
        channel_id: Option<ChannelId>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            message_id,
            channel_id,
            timestamp: Utc::now(),
        }
    }

    /// Outcome for fire-and-forget acceptance, before any delivery attempt.
    pub fn queued(message: impl Into<String>) -> Self {
        Self::new(PostStatus::Queued, message, None, None)
    }
}

/// Resolve channel → format message → deliver.
///
/// Every failure path folds into the outcome; `post` never returns an error
/// to the caller, which keeps per-item failures isolated in batch loops.
pub struct ListingPoster {
    channels: ChannelMap,
    formatter: Box<dyn ListingFormatter>,
    delivery: Arc<dyn DeliveryPort>,
}

impl ListingPoster {
    pub fn new(
        channels: ChannelMap,
        formatter: Box<dyn ListingFormatter>,
        delivery: Arc<dyn DeliveryPort>,
    ) -> Self {
        Self {
            channels,
            formatter,
            delivery,
        }
    }

    pub async fn post(&self, listing: &Listing) -> PostOutcome {
        let Some(channel) = self.channels.resolve(listing.city_id) else {
            info!(
                listing = %listing.id,
                city_id = listing.city_id,
                "no channel configured, skipping"
            );
            return PostOutcome::new(
                PostStatus::Skipped,
                format!("no channel configured for city id {}", listing.city_id),
                None,
                None,
            );
        };
        let channel = channel.clone();

        let text = self.formatter.format(listing);

        // Photo-first: a single photo with the message as caption when the
        // listing has images, plain text otherwise.
        let sent = match listing.images.first() {
            Some(photo_url) => self.delivery.send_photo(&channel, photo_url, &text).await,
            None => self.delivery.send_text(&channel, &text).await,
        };

        match sent {
            Ok(message_id) => {
                info!(
                    listing = %listing.id,
                    channel = %channel,
                    message_id = message_id.0,
                    "posted listing"
                );
                PostOutcome::new(
                    PostStatus::Posted,
                    "posted to telegram",
                    Some(message_id),
                    Some(channel),
                )
            }
            Err(Error::RateLimited { retry_after }) => {
                warn!(
                    listing = %listing.id,
                    wait_secs = retry_after.as_secs(),
                    "rate limited after retry budget"
                );
                PostOutcome::new(
                    PostStatus::Failed,
                    format!("rate limited, retry after {} seconds", retry_after.as_secs()),
                    None,
                    Some(channel),
                )
            }
            Err(err) => {
                error!(listing = %listing.id, error = %err, "failed to post listing");
                PostOutcome::new(PostStatus::Failed, err.to_string(), None, Some(channel))
            }
        }
    }
}
