/// Configuration errors for docmgr-core.
///
/// Every variant is fatal at startup: the process refuses to start rather
/// than retrying or falling back.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required key absent from both the environment and the env file
    #[error("Missing required setting '{key}' (set it in the environment or .env)")]
    Missing { key: &'static str },

    /// Key present but its value is unusable
    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    /// The env file exists but could not be read or parsed
    #[error("Failed to read env file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Result type alias for docmgr-core operations
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }

    /// Key this error refers to, if any
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::Missing { key } | Self::Invalid { key, .. } => Some(key),
            Self::EnvFile { .. } => None,
        }
    }
}
