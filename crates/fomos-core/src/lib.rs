//! Shared domain types for the fomos price-comparison service.
//!
//! Holds the product data model, title normalization, cross-site grouping,
//! the source registry, and environment-driven application configuration.

pub mod app_config;
pub mod config;
pub mod grouping;
pub mod products;
pub mod sources;
pub mod title;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_USER_AGENT};
pub use grouping::{group_products, ComparisonEntry, OtherPrice, ProductGroup};
pub use products::{EnrichedProduct, RawProduct};
pub use sources::{
    default_sources, load_sources, parse_sources, SiteKind, SourceSpec, SourcesFile,
};
pub use title::normalize_title;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("invalid sources config: {0}")]
    Validation(String),
}
