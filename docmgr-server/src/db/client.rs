//! Client seam for the external document database
//!
//! [`DocumentClient`] is what the scoping helpers talk to. The production
//! implementation is [`crate::db::CosmosClient`]; tests substitute their own.

use async_trait::async_trait;
use thiserror::Error;

/// Maximum length of a database or container id
const MAX_RESOURCE_ID_LEN: usize = 255;

/// Characters the service does not accept in resource ids
const FORBIDDEN_ID_CHARS: [char; 4] = ['/', '\\', '?', '#'];

/// Errors raised while opening, using, or closing a client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid connection string: {reason}")]
    ConnectionString { reason: String },

    #[error("invalid {kind} id '{id}': {reason}")]
    InvalidResourceId {
        kind: &'static str,
        id: String,
        reason: &'static str,
    },

    #[error("client is closed")]
    Closed,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn connection_string(reason: impl Into<String>) -> Self {
        Self::ConnectionString {
            reason: reason.into(),
        }
    }
}

/// Handle to a database inside the account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHandle {
    id: String,
}

impl DatabaseHandle {
    /// Validate `id` and build a handle for it
    pub fn new(id: &str) -> Result<Self> {
        validate_resource_id("database", id)?;
        Ok(Self { id: id.to_string() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resource link, e.g. `dbs/doc-manager`
    pub fn link(&self) -> String {
        format!("dbs/{}", self.id)
    }
}

/// Handle to a container inside a database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    database_id: String,
    id: String,
}

impl ContainerHandle {
    /// Validate `id` and build a handle for it within `database`
    pub fn new(database: &DatabaseHandle, id: &str) -> Result<Self> {
        validate_resource_id("container", id)?;
        Ok(Self {
            database_id: database.id.clone(),
            id: id.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// Resource link, e.g. `dbs/doc-manager/colls/documents`
    pub fn link(&self) -> String {
        format!("dbs/{}/colls/{}", self.database_id, self.id)
    }
}

/// An open connection to the document database service.
///
/// `database` and `container` only build handles; `close` releases the
/// underlying session and may be awaited once.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Resolve a database handle by id
    fn database(&self, id: &str) -> Result<DatabaseHandle>;

    /// Resolve a container handle within `database`
    fn container(&self, database: &DatabaseHandle, name: &str) -> Result<ContainerHandle>;

    /// Release the connection
    async fn close(&self) -> Result<()>;
}

/// Check an id against the service's naming rules
pub fn validate_resource_id(kind: &'static str, id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        Some("must not be empty")
    } else if id.chars().count() > MAX_RESOURCE_ID_LEN {
        Some("must be at most 255 characters")
    } else if id.contains(FORBIDDEN_ID_CHARS) {
        Some("must not contain '/', '\\', '?' or '#'")
    } else if id.ends_with(' ') {
        Some("must not end with a space")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ClientError::InvalidResourceId {
            kind,
            id: id.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
