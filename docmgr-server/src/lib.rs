//! docmgr-server: HTTP shell and document database accessor
//!
//! - [`db`]: scoped access to the external document database
//! - [`http`]: axum application exposing the health check and API docs

pub mod db;
pub mod http;

pub use db::{get_container, get_database, scoped, with_client, ClientError, CosmosClient, DocumentClient};
pub use http::{run_server, ApiMetadata, ServerConfig};
