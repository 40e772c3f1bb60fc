//! HTTP client for the Shopify Admin GraphQL API.

mod fetch_all;
mod mutations;

use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ShopifyConfig;
use crate::error::ShopifyError;
use crate::rate_limit::{cooldown_on_rate_limit, is_throttle_code};
use crate::types::GraphQlResponse;

pub use fetch_all::Page;

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
pub(super) const MAX_PAGES: usize = 200;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

/// Client for one store's Admin GraphQL endpoint.
///
/// HTTP 429 and GraphQL `THROTTLED` errors become
/// [`ShopifyError::RateLimited`] after the configured cooldown; nothing is
/// retried automatically. Other non-2xx responses are
/// [`ShopifyError::UnexpectedStatus`].
pub struct ShopifyClient {
    pub(super) client: Client,
    pub(super) config: ShopifyConfig,
}

impl ShopifyClient {
    /// Creates a `ShopifyClient` with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent("sellorder/0.1 (catalog-reorder)")
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    /// Posts one GraphQL document and returns the parsed envelope.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::RateLimited`] on 429 or a `THROTTLED` error code,
    ///   after the cooldown.
    /// - [`ShopifyError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ShopifyError::Http`] on network or TLS failure.
    /// - [`ShopifyError::Deserialize`] if the body is not the expected shape.
    pub(super) async fn execute<V, T>(
        &self,
        document: &str,
        variables: V,
        context: &str,
    ) -> Result<GraphQlResponse<T>, ShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        cooldown_on_rate_limit(
            self.config.rate_limit_cooldown,
            self.send(document, variables, context),
        )
        .await
    }

    async fn send<V, T>(
        &self,
        document: &str,
        variables: V,
        context: &str,
    ) -> Result<GraphQlResponse<T>, ShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, &self.config.access_token)
            .json(&GraphQlRequest {
                query: document,
                variables,
            })
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ShopifyError::RateLimited {
                retry_after_secs: parse_retry_after(response.headers()),
            });
        }

        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_owned(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<GraphQlResponse<T>>(&body).map_err(|e| {
            ShopifyError::Deserialize {
                context: context.to_owned(),
                source: e,
            }
        })?;

        if parsed.errors.iter().any(|e| is_throttle_code(e.code())) {
            return Err(ShopifyError::RateLimited {
                retry_after_secs: None,
            });
        }

        Ok(parsed)
    }

    /// Takes `data` out of an envelope, failing on any top-level error.
    pub(super) fn into_data<T>(
        response: GraphQlResponse<T>,
        context: &str,
    ) -> Result<T, ShopifyError> {
        if !response.errors.is_empty() {
            return Err(ShopifyError::GraphQl {
                context: context.to_owned(),
                messages: response.errors.into_iter().map(|e| e.message).collect(),
            });
        }
        response.data.ok_or_else(|| ShopifyError::MissingData {
            context: context.to_owned(),
        })
    }
}

/// Reads `Retry-After` as whole seconds. Shopify sends values like `"2.0"`.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().split('.').next())
        .and_then(|s| s.parse::<u64>().ok())
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
