//! Settings inspection command

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use docmgr_core::Settings;
use docmgr_server::db::ConnectionString;

/// Arguments for the settings command
#[derive(Parser, Debug)]
pub struct SettingsArgs {
    /// Only check that settings load; print nothing on success
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Load settings, check the connection string parses, and print a summary
pub fn run_settings(args: SettingsArgs, env_file: &Path) -> Result<()> {
    let settings = Settings::from_env_file(env_file).context("Failed to load settings")?;
    let connection: ConnectionString = settings
        .cosmos_connection_string
        .parse()
        .context("cosmos_connection_string is not a valid account connection string")?;

    if args.quiet {
        return Ok(());
    }

    let default_marker = if settings.uses_default_database() {
        " (default)"
    } else {
        ""
    };
    println!("env file:                 {}", env_file.display());
    println!("cosmos_database_name:     {}{}", settings.cosmos_database_name, default_marker);
    println!("account endpoint:         {}", connection.endpoint());
    println!("cosmos_connection_string: <redacted>");

    Ok(())
}
