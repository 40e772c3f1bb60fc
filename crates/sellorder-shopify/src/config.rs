//! Immutable transport settings handed to [`crate::ShopifyClient`].

use std::time::Duration;

use reqwest::Url;
use sellorder_core::AppConfig;

use crate::error::ShopifyError;

/// Everything a remote call needs to know. Built once at startup; there is no
/// shared mutable endpoint or header state anywhere else.
#[derive(Clone)]
pub struct ShopifyConfig {
    pub endpoint: Url,
    pub access_token: String,
    pub request_timeout: Duration,
    /// Pause applied after a rate-limit response, before the error surfaces.
    pub rate_limit_cooldown: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("access_token", &"[redacted]")
            .field("request_timeout", &self.request_timeout)
            .field("rate_limit_cooldown", &self.rate_limit_cooldown)
            .finish()
    }
}

impl ShopifyConfig {
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidEndpoint`] if the store domain cannot be
    /// turned into an Admin API URL.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ShopifyError> {
        Ok(Self {
            endpoint: graphql_endpoint(&config.shopify_store_domain, &config.shopify_api_version)?,
            access_token: config.shopify_access_token.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            rate_limit_cooldown: Duration::from_secs(config.rate_limit_cooldown_secs),
        })
    }
}

/// Builds the Admin GraphQL URL for a store.
///
/// Accepts a bare domain (`"tees.myshopify.com"`) or a URL with a scheme and
/// any path (`"https://tees.myshopify.com/admin"`); only the origin is kept.
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidEndpoint`] when the domain does not parse
/// or the API version is empty.
pub fn graphql_endpoint(store_domain: &str, api_version: &str) -> Result<Url, ShopifyError> {
    let invalid = |reason: String| ShopifyError::InvalidEndpoint {
        store_domain: store_domain.to_owned(),
        reason,
    };

    let api_version = api_version.trim().trim_matches('/');
    if api_version.is_empty() {
        return Err(invalid("API version is empty".to_owned()));
    }

    let trimmed = store_domain.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("no host".to_owned()));
    }
    let origin = parsed.origin().ascii_serialization();

    Url::parse(&format!("{origin}/admin/api/{api_version}/graphql.json"))
        .map_err(|e| invalid(e.to_string()))
}
