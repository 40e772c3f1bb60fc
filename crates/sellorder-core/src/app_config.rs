use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub shopify_store_domain: String,
    pub shopify_access_token: String,
    pub shopify_api_version: String,
    pub product_tag: String,
    pub color_option_label: String,
    pub sales_path: PathBuf,
    pub page_size: u32,
    pub page_delay_ms: u64,
    pub product_delay_ms: u64,
    pub rate_limit_cooldown_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("shopify_store_domain", &self.shopify_store_domain)
            .field("shopify_access_token", &"[redacted]")
            .field("shopify_api_version", &self.shopify_api_version)
            .field("product_tag", &self.product_tag)
            .field("color_option_label", &self.color_option_label)
            .field("sales_path", &self.sales_path)
            .field("page_size", &self.page_size)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("product_delay_ms", &self.product_delay_ms)
            .field("rate_limit_cooldown_secs", &self.rate_limit_cooldown_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .finish()
    }
}
