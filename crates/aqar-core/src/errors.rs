use std::time::Duration;

/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type so the posting
/// pipeline can handle failures consistently (rate-limit hint vs terminal).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("rate limited, retry after {} seconds", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
