pub mod app_config;
pub mod catalog;
pub mod config;
pub mod filter;

pub use app_config::{AppConfig, Environment};
pub use catalog::CatalogItem;
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{filter_catalog, FilterCriteria, ValidationError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
