//! Layered configuration: defaults, the user file, then the environment.

use std::path::PathBuf;

use thiserror::Error;

mod load;
mod merge;
mod schema;

pub use load::{load, load_user_config};
pub use merge::{
    DATA_DIR_ENV, EDITOR_ENV, apply_env_overrides, apply_env_overrides_from, merge_layers,
};
pub use schema::{
    Config, ConfigLayer, DEFAULT_EDITOR, DataPaths, FileLoggingConfig, FileLoggingConfigOverride,
    LogFormat, LogRotation, LoggingConfig, LoggingConfigOverride,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
}
