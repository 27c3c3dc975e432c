//! Telegram adapter (teloxide).
//!
//! Implements the `aqar-core` DeliveryPort over the Telegram Bot API, with
//! the bounded retry loop keyed to provider rate-limit hints.

use std::sync::OnceLock;

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InputFile, InputMedia, InputMediaPhoto, ParseMode, Recipient},
};

use aqar_core::{
    delivery::{retry::send_with_retry, DeliveryPort, RetryPolicy},
    domain::{ChannelId, MessageId},
    errors::Error,
    Result,
};

pub struct TelegramDelivery {
    token: String,
    policy: RetryPolicy,
    bot: OnceLock<Bot>,
}

impl TelegramDelivery {
    pub fn new(token: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            token: token.into(),
            policy,
            bot: OnceLock::new(),
        }
    }

    /// The underlying client is built on first use and reused for the
    /// process lifetime.
    fn bot(&self) -> &Bot {
        self.bot.get_or_init(|| Bot::new(self.token.clone()))
    }

    fn recipient(channel: &ChannelId) -> Recipient {
        if let Ok(id) = channel.0.parse::<i64>() {
            return Recipient::Id(teloxide::types::ChatId(id));
        }
        Recipient::ChannelUsername(channel.0.clone())
    }

    fn photo_input(url: &str) -> Result<InputFile> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| Error::Delivery(format!("invalid photo url {url:?}: {e}")))?;
        Ok(InputFile::url(parsed))
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        match e {
            teloxide::RequestError::RetryAfter(retry_after) => Error::RateLimited { retry_after },
            other => Error::Delivery(format!("telegram error: {other}")),
        }
    }
}

#[async_trait]
impl DeliveryPort for TelegramDelivery {
    async fn send_text(&self, channel: &ChannelId, html: &str) -> Result<MessageId> {
        let bot = self.bot().clone();
        let recipient = Self::recipient(channel);
        let html = html.to_string();

        let msg = send_with_retry(self.policy, move || {
            let bot = bot.clone();
            let recipient = recipient.clone();
            let html = html.clone();
            async move {
                bot.send_message(recipient, html)
                    .parse_mode(ParseMode::Html)
                    .await
                    .map_err(Self::map_err)
            }
        })
        .await?;
        Ok(MessageId(msg.id.0))
    }

    async fn send_photo(
        &self,
        channel: &ChannelId,
        photo_url: &str,
        caption: &str,
    ) -> Result<MessageId> {
        let bot = self.bot().clone();
        let recipient = Self::recipient(channel);
        let photo = Self::photo_input(photo_url)?;
        let caption = caption.to_string();

        let msg = send_with_retry(self.policy, move || {
            let bot = bot.clone();
            let recipient = recipient.clone();
            let photo = photo.clone();
            let caption = caption.clone();
            async move {
                bot.send_photo(recipient, photo)
                    .caption(caption)
                    .parse_mode(ParseMode::Html)
                    .await
                    .map_err(Self::map_err)
            }
        })
        .await?;
        Ok(MessageId(msg.id.0))
    }

    async fn send_media_group(
        &self,
        channel: &ChannelId,
        photo_urls: &[String],
        caption: &str,
    ) -> Result<Vec<MessageId>> {
        let bot = self.bot().clone();
        let recipient = Self::recipient(channel);

        let mut media = Vec::with_capacity(photo_urls.len());
        for (idx, url) in photo_urls.iter().enumerate() {
            let mut item = InputMediaPhoto::new(Self::photo_input(url)?);
            if idx == 0 {
                item = item
                    .caption(caption.to_string())
                    .parse_mode(ParseMode::Html);
            }
            media.push(InputMedia::Photo(item));
        }

        let msgs = send_with_retry(self.policy, move || {
            let bot = bot.clone();
            let recipient = recipient.clone();
            let media = media.clone();
            async move {
                bot.send_media_group(recipient, media)
                    .await
                    .map_err(Self::map_err)
            }
        })
        .await?;
        Ok(msgs.into_iter().map(|m| MessageId(m.id.0)).collect())
    }

    async fn health_check(&self) -> bool {
        match self.bot().get_me().await {
            Ok(me) => {
                tracing::debug!(bot = %me.username(), "telegram health check ok");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "telegram health check failed");
                false
            }
        }
    }
}
