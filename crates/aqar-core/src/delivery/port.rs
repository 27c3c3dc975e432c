use async_trait::async_trait;

use crate::{
    domain::{ChannelId, MessageId},
    Result,
};

/// Outbound messaging port.
///
/// Telegram is the first implementation; the shape leaves room for other
/// adapters behind the same interface. Implementations own the retry
/// budget: a returned error means the budget is already spent.
#[async_trait]
pub trait DeliveryPort: Send + Sync {
    /// Send an HTML text message. Returns the provider-assigned message id.
    async fn send_text(&self, channel: &ChannelId, html: &str) -> Result<MessageId>;

    /// Send a single photo by URL with an HTML caption.
    async fn send_photo(
        &self,
        channel: &ChannelId,
        photo_url: &str,
        caption: &str,
    ) -> Result<MessageId>;

    /// Send several photos as one album, caption on the first item.
    async fn send_media_group(
        &self,
        channel: &ChannelId,
        photo_urls: &[String],
        caption: &str,
    ) -> Result<Vec<MessageId>>;

    /// Provider connectivity probe. Never errors: any failure is `false`.
    async fn health_check(&self) -> bool;
}
