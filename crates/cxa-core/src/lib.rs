//! Shared domain types, configuration, and dataset IO for the CXA review
//! analytics pipeline.

pub mod app_config;
pub mod banks;
pub mod config;
pub mod dataset;
pub mod reviews;

use thiserror::Error;

pub use app_config::AppConfig;
pub use banks::{load_banks, BankConfig, BanksFile, ThemeDefinition, ThemeTable};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{
    read_csv, write_csv, DataLayout, DatasetError, PreprocessedRecord, SentimentRecord,
    ThematicRecord,
};
pub use reviews::{
    AnnotatedReview, CleanedReview, Judgment, RawReview, SentimentLabel, GENERAL_THEME,
    SOURCE_GOOGLE_PLAY,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read banks file {path}: {source}")]
    BanksFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse banks file: {0}")]
    BanksFileParse(#[from] serde_yaml::Error),

    #[error("banks config validation failed: {0}")]
    Validation(String),
}
