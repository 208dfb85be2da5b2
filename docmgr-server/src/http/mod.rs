//! HTTP layer
//!
//! Axum server with:
//! - `GET /health` liveness check
//! - Swagger UI and ReDoc pages over a generated OpenAPI document
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown

pub mod metadata;
pub mod routes;
pub mod server;

pub use metadata::ApiMetadata;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
