//! Process settings loaded once at startup
//!
//! Sources, highest priority first:
//! 1. Process environment variables
//! 2. `.env` file in the working directory (or an explicit path)
//!
//! Keys are matched case-insensitively, so `COSMOS_CONNECTION_STRING` and
//! `cosmos_connection_string` name the same setting. Reading the env file
//! never modifies the process environment.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, Result};

/// Database used when `cosmos_database_name` is not set
pub const DEFAULT_DATABASE_NAME: &str = "doc-manager";

pub const CONNECTION_STRING_KEY: &str = "cosmos_connection_string";
pub const DATABASE_NAME_KEY: &str = "cosmos_database_name";

/// Default env file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Typed process configuration.
///
/// Immutable after construction; pass it by reference to whatever needs it.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Connection secret for the document database account
    pub cosmos_connection_string: String,
    /// Database id resolved inside the account
    pub cosmos_database_name: String,
    /// Set when `cosmos_database_name` was absent from every source
    default_database: bool,
}

/// Recognised keys pulled out of the merged sources, before validation
#[derive(Debug, Default)]
struct RawSettings {
    cosmos_connection_string: Option<String>,
    cosmos_database_name: Option<String>,
}

impl Settings {
    /// Load from the process environment and the given env file.
    ///
    /// A missing env file is not an error; a malformed one is.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_entries = read_env_file(path)?;
        let process_env = utf8_env(std::env::vars_os())?;

        Self::from_sources(file_entries, process_env)
    }

    /// Build settings from explicit sources. Entries from `process_env`
    /// override entries from `file_entries`.
    pub fn from_sources<F, E>(file_entries: F, process_env: E) -> Result<Self>
    where
        F: IntoIterator<Item = (String, String)>,
        E: IntoIterator<Item = (String, String)>,
    {
        let mut merged: HashMap<String, String> = HashMap::new();
        for (key, value) in file_entries.into_iter().chain(process_env) {
            merged.insert(key.to_ascii_lowercase(), value);
        }

        RawSettings {
            cosmos_connection_string: merged.remove(CONNECTION_STRING_KEY),
            cosmos_database_name: merged.remove(DATABASE_NAME_KEY),
        }
        .validate()
    }

    /// Whether `cosmos_database_name` was left unset and the built-in
    /// default applied. An explicit `doc-manager` does not count.
    pub fn uses_default_database(&self) -> bool {
        self.default_database
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings> {
        let cosmos_connection_string = self.cosmos_connection_string.ok_or(ConfigError::Missing {
            key: CONNECTION_STRING_KEY,
        })?;
        if cosmos_connection_string.trim().is_empty() {
            return Err(ConfigError::invalid(CONNECTION_STRING_KEY, "must not be empty"));
        }

        let default_database = self.cosmos_database_name.is_none();
        let cosmos_database_name = match self.cosmos_database_name {
            Some(name) if name.trim().is_empty() => {
                return Err(ConfigError::invalid(DATABASE_NAME_KEY, "must not be empty"));
            }
            Some(name) => name,
            None => DEFAULT_DATABASE_NAME.to_string(),
        };

        Ok(Settings {
            cosmos_connection_string,
            cosmos_database_name,
            default_database,
        })
    }
}

/// Convert environment pairs to strings.
///
/// Names that are not UTF-8 cannot match a recognised key and are skipped.
/// A recognised key with a non-UTF-8 value is an error rather than absent.
fn utf8_env<I>(vars: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut out = Vec::new();
    for (name, value) in vars {
        let Ok(name) = name.into_string() else {
            continue;
        };
        match value.into_string() {
            Ok(value) => out.push((name, value)),
            Err(_) => {
                let lowered = name.to_ascii_lowercase();
                if lowered == CONNECTION_STRING_KEY {
                    return Err(ConfigError::invalid(CONNECTION_STRING_KEY, "value is not valid UTF-8"));
                }
                if lowered == DATABASE_NAME_KEY {
                    return Err(ConfigError::invalid(DATABASE_NAME_KEY, "value is not valid UTF-8"));
                }
            }
        }
    }
    Ok(out)
}

/// Read `KEY=value` pairs from an env file without touching the environment
fn read_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            debug!("No env file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let entries = iter
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(count = entries.len(), "Read env file {}", path.display());
    Ok(entries)
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("cosmos_connection_string", &"<redacted>")
            .field("cosmos_database_name", &self.cosmos_database_name)
            .finish()
    }
}
