use crate::app_config::AppConfig;
use crate::ConfigError;

/// Largest page size the Admin GraphQL `products` connection accepts.
const MAX_PAGE_SIZE: u32 = 250;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the real environment, so
/// tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let shopify_store_domain = require("SHOPIFY_STORE_DOMAIN")?;
    let shopify_access_token = require("SHOPIFY_ACCESS_TOKEN")?;
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-10");

    let product_tag = or_default("SELLORDER_PRODUCT_TAG", "sort-by-sales")
        .trim()
        .to_owned();
    let color_option_label = or_default("SELLORDER_COLOR_OPTION", "Color")
        .trim()
        .to_owned();
    if color_option_label.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "SELLORDER_COLOR_OPTION".to_string(),
            reason: "color option label must not be empty".to_string(),
        });
    }

    let sales_path = PathBuf::from(or_default("SELLORDER_SALES_PATH", "./sales.csv"));

    let page_size = parse_u32("SELLORDER_PAGE_SIZE", "50")?;
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidEnvVar {
            var: "SELLORDER_PAGE_SIZE".to_string(),
            reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        });
    }

    let page_delay_ms = parse_u64("SELLORDER_PAGE_DELAY_MS", "500")?;
    let product_delay_ms = parse_u64("SELLORDER_PRODUCT_DELAY_MS", "1000")?;
    let rate_limit_cooldown_secs = parse_u64("SELLORDER_RATE_LIMIT_COOLDOWN_SECS", "2")?;
    let request_timeout_secs = parse_u64("SELLORDER_REQUEST_TIMEOUT_SECS", "30")?;
    let log_level = or_default("SELLORDER_LOG_LEVEL", "info");
    let log_file = lookup("SELLORDER_LOG_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        shopify_store_domain,
        shopify_access_token,
        shopify_api_version,
        product_tag,
        color_option_label,
        sales_path,
        page_size,
        page_delay_ms,
        product_delay_ms,
        rate_limit_cooldown_secs,
        request_timeout_secs,
        log_level,
        log_file,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
