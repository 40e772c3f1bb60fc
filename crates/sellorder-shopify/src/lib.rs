pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pacer;
pub mod pagination;
pub mod queries;
pub mod rate_limit;
pub mod types;

pub use client::{Page, ShopifyClient};
pub use config::ShopifyConfig;
pub use error::ShopifyError;
pub use normalize::normalize_product;
pub use pacer::{PacedQueue, Pacer};
