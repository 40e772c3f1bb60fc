pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod sales;

pub use app_config::AppConfig;
pub use catalog::{Image, Product, ProductOption, Variant};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use sales::SalesRecord;
