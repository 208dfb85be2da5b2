//! HTTP server command
//!
//! Loads settings first so a misconfigured process never binds a port.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use docmgr_core::Settings;
use docmgr_server::http::{run_server, ApiMetadata, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "DOCMGR_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, env_file: &Path) -> Result<()> {
    let settings = Settings::from_env_file(env_file).context("Failed to load settings")?;
    tracing::info!(
        database = %settings.cosmos_database_name,
        default_database = settings.uses_default_database(),
        "Settings loaded"
    );

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(config, ApiMetadata::default())
        .await
        .context("Server error")?;

    Ok(())
}
