pub mod app_config;
pub mod catalog;
pub mod config;
pub mod overrides;
pub mod platform;
pub mod records;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, Catalog, CatalogFile, CatalogProduct};
pub use config::{load_app_config, load_app_config_from_env};
pub use overrides::{load_overrides, ManualOverride, ManualOverrides};
pub use platform::{Column, Platform, RuleSet};
pub use records::{
    ConfidenceTier, ConsolidatedRecord, MappedProduct, MappingResult, MatchStatus,
    RawProductRecord, SplitRecord, StatisticsEntry,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_yaml::Error),

    #[error("failed to read overrides file {path}: {source}")]
    OverridesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse overrides file: {0}")]
    OverridesFileParse(#[source] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Removes every whitespace character, including the full-width space that
/// shows up in CJK exports.
#[must_use]
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
