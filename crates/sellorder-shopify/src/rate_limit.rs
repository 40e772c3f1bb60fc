//! Rate-limit cooldown for Shopify calls.
//!
//! A rate-limited call is never retried here. The cooldown only delays the
//! error so that whatever the caller does next lands after the bucket has had
//! time to refill.

use std::future::Future;
use std::time::Duration;

use crate::error::ShopifyError;

/// Runs `operation` once. On [`ShopifyError::RateLimited`] sleeps for the
/// longer of `cooldown` and the server's `Retry-After`, then returns the
/// error unchanged. Every other result passes straight through.
pub(crate) async fn cooldown_on_rate_limit<T, Fut>(
    cooldown: Duration,
    operation: Fut,
) -> Result<T, ShopifyError>
where
    Fut: Future<Output = Result<T, ShopifyError>>,
{
    match operation.await {
        Err(ShopifyError::RateLimited { retry_after_secs }) => {
            let wait = retry_after_secs
                .map(Duration::from_secs)
                .map_or(cooldown, |server| server.max(cooldown));
            tracing::warn!(
                cooldown_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "rate limited by Shopify; cooling down before reporting failure"
            );
            tokio::time::sleep(wait).await;
            Err(ShopifyError::RateLimited { retry_after_secs })
        }
        other => other,
    }
}

/// Returns `true` when a GraphQL error code marks a throttled request.
pub(crate) fn is_throttle_code(code: Option<&str>) -> bool {
    code.is_some_and(|c| c.eq_ignore_ascii_case("THROTTLED"))
}
