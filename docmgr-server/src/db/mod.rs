//! Document database layer - client handles and scoped acquisition
//!
//! # Design Principles
//!
//! - One client per unit of work, closed when the scope ends (not a pool)
//! - Resolving database/container handles performs no network I/O
//! - Errors from the collaborator propagate unchanged, no retries

pub mod client;
pub mod cosmos;
pub mod scope;

pub use client::{ClientError, ContainerHandle, DatabaseHandle, DocumentClient, Result};
pub use cosmos::{ConnectionString, CosmosClient};
pub use scope::{get_container, get_database, scoped, with_client};
