//! Cosmos-style document database client
//!
//! Parses an account connection string of the form
//! `AccountEndpoint=https://<account>.documents.azure.com:443/;AccountKey=<base64>;`
//! and holds an HTTP session against the account endpoint until closed.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Url;
use tracing::debug;

use super::client::{ClientError, ContainerHandle, DatabaseHandle, DocumentClient, Result};

const ENDPOINT_KEY: &str = "accountendpoint";
const ACCOUNT_KEY: &str = "accountkey";

/// Parsed account connection string
#[derive(Clone)]
pub struct ConnectionString {
    endpoint: Url,
    key: Vec<u8>,
}

impl ConnectionString {
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Decoded account key bytes
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

impl FromStr for ConnectionString {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        let mut endpoint = None;
        let mut key = None;

        for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // Split on the first '=' only: base64 keys end in '=' padding
            let (name, value) = part
                .split_once('=')
                .ok_or_else(|| ClientError::connection_string("segment without '='"))?;

            match name.trim().to_ascii_lowercase().as_str() {
                ENDPOINT_KEY => endpoint = Some(value.trim()),
                ACCOUNT_KEY => key = Some(value.trim()),
                _ => {}
            }
        }

        let endpoint = endpoint.ok_or_else(|| ClientError::connection_string("missing AccountEndpoint"))?;
        let key = key.ok_or_else(|| ClientError::connection_string("missing AccountKey"))?;

        let endpoint = Url::parse(endpoint)
            .map_err(|e| ClientError::connection_string(format!("AccountEndpoint is not a URL: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::connection_string(format!(
                "AccountEndpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        if key.is_empty() {
            return Err(ClientError::connection_string("AccountKey is empty"));
        }
        let key = STANDARD
            .decode(key)
            .map_err(|e| ClientError::connection_string(format!("AccountKey is not base64: {e}")))?;

        Ok(Self { endpoint, key })
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("endpoint", &self.endpoint.as_str())
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Client for one document database account.
///
/// Owns an HTTP session from construction until [`DocumentClient::close`].
pub struct CosmosClient {
    connection: ConnectionString,
    session: Mutex<Option<reqwest::Client>>,
}

impl CosmosClient {
    /// Open a client from an account connection string
    pub fn from_connection_string(secret: &str) -> Result<Self> {
        let connection: ConnectionString = secret.parse()?;
        Self::new(connection)
    }

    pub fn new(connection: ConnectionString) -> Result<Self> {
        let session = reqwest::Client::builder()
            .user_agent(concat!("docmgr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(endpoint = %connection.endpoint, "Opened document database client");

        Ok(Self {
            connection,
            session: Mutex::new(Some(session)),
        })
    }

    pub fn endpoint(&self) -> &Url {
        self.connection.endpoint()
    }

    pub fn is_closed(&self) -> bool {
        self.lock_session().is_none()
    }

    /// Absolute URL of a resource link on this account
    pub fn resource_url(&self, link: &str) -> Result<Url> {
        self.connection
            .endpoint
            .join(link)
            .map_err(|e| ClientError::connection_string(format!("cannot join '{link}': {e}")))
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<reqwest::Client>> {
        // A poisoned lock still holds a valid Option
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentClient for CosmosClient {
    fn database(&self, id: &str) -> Result<DatabaseHandle> {
        self.ensure_open()?;
        DatabaseHandle::new(id)
    }

    fn container(&self, database: &DatabaseHandle, name: &str) -> Result<ContainerHandle> {
        self.ensure_open()?;
        ContainerHandle::new(database, name)
    }

    async fn close(&self) -> Result<()> {
        let session = self.lock_session().take();
        match session {
            Some(session) => {
                drop(session);
                debug!(endpoint = %self.connection.endpoint, "Closed document database client");
                Ok(())
            }
            None => Err(ClientError::Closed),
        }
    }
}

impl fmt::Debug for CosmosClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosClient")
            .field("endpoint", &self.connection.endpoint.as_str())
            .field("closed", &self.is_closed())
            .finish()
    }
}
