//! Error types for ws-core

use thiserror::Error;

/// Core error type for Warehouse Sync
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Unknown destination dialect
    #[error("[E003] Unknown dialect '{name}'. Valid dialects: snowflake, bigquery, redshift")]
    UnknownDialect { name: String },

    /// E004: Invalid BigQuery partition settings
    #[error("[E004] Invalid BigQuery partition settings: {message}")]
    InvalidPartition { message: String },

    /// E005: IO error with file path context
    #[error("[E005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E006: YAML parse error
    #[error("[E006] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
