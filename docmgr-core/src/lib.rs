//! docmgr-core: process configuration for the doc-manager backend
//!
//! Holds the typed [`Settings`] record that every other crate receives
//! by reference, and the [`ConfigError`] raised when it cannot be built.

pub mod error;
pub mod settings;

pub use error::{ConfigError, Result};
pub use settings::{Settings, DEFAULT_DATABASE_NAME};
