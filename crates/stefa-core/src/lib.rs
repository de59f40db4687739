use thiserror::Error;

pub mod app_config;
pub mod books;
pub mod categories;
pub mod config;
pub mod prefixes;

pub use app_config::{AppConfig, Environment};
pub use books::{placeholder_title, BookRecord, UNKNOWN_AUTHOR};
pub use categories::{CategoryEntry, CategoryLookup};
pub use config::{load_app_config, load_app_config_from_env};
pub use prefixes::{load_prefixes, PrefixEntry, PrefixTable, PrefixesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read prefixes file at {path}")]
    PrefixFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse prefixes file")]
    PrefixFileParse(#[from] serde_yaml::Error),
    #[error("config validation failed: {0}")]
    Validation(String),
}
