//! TOML-backed configuration loading.
//!
//! Every binary in the workspace reads its settings from a single TOML file and
//! passes the typed result into constructors; nothing reads configuration
//! implicitly at module level.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::env::MissingEnvVarError;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment variable required by the application is not set.
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    /// A value parsed fine but is outside its allowed range.
    #[error("invalid config value for `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Parse a typed config from a TOML string.
pub fn parse_toml<T: DeserializeOwned>(text: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Read a TOML file from disk and parse it into `T`.
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_toml(&text)
}
