use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Shopify{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("unexpected HTTP status {status} for {context}")]
    UnexpectedStatus { status: u16, context: String },

    #[error("GraphQL errors for {context}: {}", .messages.join("; "))]
    GraphQl {
        context: String,
        messages: Vec<String>,
    },

    #[error("response for {context} carried no data")]
    MissingData { context: String },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid store domain \"{store_domain}\": {reason}")]
    InvalidEndpoint {
        store_domain: String,
        reason: String,
    },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs
        .map(|s| format!(" (retry after {s}s)"))
        .unwrap_or_default()
}
