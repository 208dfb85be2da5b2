//! docmgr - doc-manager backend entry point
//!
//! - `docmgr serve`: run the HTTP API (health check + API docs)
//! - `docmgr settings`: validate configuration and print it with secrets redacted
//!
//! Settings are read once here and passed down; nothing below `main` reads
//! the environment on its own.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "docmgr",
    author,
    version,
    about = "Backend for managing contract lifecycle documents"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    /// Env file read for settings (process environment takes precedence)
    #[arg(long, global = true, env = "DOCMGR_ENV_FILE", default_value = docmgr_core::settings::DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Validate settings and print them with the connection secret redacted
    Settings(commands::settings::SettingsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &cli.env_file).await,
        Commands::Settings(args) => commands::run_settings(args, &cli.env_file),
    }
}
