use std::{future::Future, time::Duration};

use tokio::time::sleep;
use tracing::warn;

use crate::{errors::Error, Result};

/// Bounded retry schedule for outbound sends.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempt budget, including the first try.
    pub max_attempts: u32,
    /// Base for the linear back-off on non-rate-limit failures.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Run `op` under the policy.
///
/// Rate-limit failures sleep for exactly the provider-supplied hint and are
/// surfaced as-is once the budget is spent, keeping the back-off guidance
/// for the caller. Any other failure backs off linearly
/// (`base_delay * attempt`, 1-based) and is wrapped into a `Delivery` error
/// after the final attempt. The sleeps are the only suspension points and
/// are cancelled with the caller's future.
pub async fn send_with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(Error::RateLimited { retry_after }) => {
                if attempt >= max {
                    return Err(Error::RateLimited { retry_after });
                }
                warn!(
                    attempt,
                    max,
                    wait_secs = retry_after.as_secs(),
                    "rate limited, waiting before retry"
                );
                sleep(retry_after).await;
            }
            Err(err) => {
                if attempt >= max {
                    return Err(Error::Delivery(format!(
                        "failed after {max} attempts: {err}"
                    )));
                }
                warn!(attempt, max, error = %err, "send failed, backing off");
                sleep(policy.base_delay * attempt).await;
            }
        }
        attempt += 1;
    }
}
