//! Command implementations for the docmgr CLI

pub mod serve;
pub mod settings;

pub use serve::run_serve;
pub use settings::run_settings;
