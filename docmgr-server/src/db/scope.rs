//! Scoped client acquisition
//!
//! A client lives for exactly one unit of work: it is opened, lent to the
//! body, and closed once whether the body succeeds, fails, or panics.
//!
//! ```ignore
//! let container = with_client(&settings, |client| {
//!     let settings = settings.clone();
//!     Box::pin(async move { Ok::<_, ClientError>(get_container(client, &settings, "documents")?) })
//! })
//! .await?;
//! ```

use std::panic::AssertUnwindSafe;

use docmgr_core::Settings;
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, warn};

use super::client::{ClientError, ContainerHandle, DatabaseHandle, DocumentClient, Result};
use super::cosmos::CosmosClient;

/// Open a [`CosmosClient`] from the settings' connection string and run
/// `body` with it inside [`scoped`].
pub async fn with_client<T, E, F>(settings: &Settings, body: F) -> std::result::Result<T, E>
where
    T: Send,
    E: From<ClientError> + Send,
    F: for<'c> FnOnce(&'c CosmosClient) -> BoxFuture<'c, std::result::Result<T, E>>,
{
    let client = CosmosClient::from_connection_string(&settings.cosmos_connection_string)?;
    scoped(client, body).await
}

/// Run `body` with `client`, then close the client exactly once.
///
/// - body `Ok`, close `Ok`: the body's value
/// - body `Ok`, close `Err`: the close error
/// - body `Err`: the body's error unchanged (a close failure is logged)
/// - body panics: the client is closed, then the panic resumes
pub async fn scoped<C, T, E, F>(client: C, body: F) -> std::result::Result<T, E>
where
    C: DocumentClient,
    T: Send,
    E: From<ClientError> + Send,
    F: for<'c> FnOnce(&'c C) -> BoxFuture<'c, std::result::Result<T, E>>,
{
    let outcome = AssertUnwindSafe(body(&client)).catch_unwind().await;
    let closed = client.close().await;

    match outcome {
        Ok(Ok(value)) => {
            closed?;
            debug!("Client scope finished");
            Ok(value)
        }
        Ok(Err(err)) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "Failed to close client after scope error");
            }
            Err(err)
        }
        Err(panic) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "Failed to close client after scope panic");
            }
            std::panic::resume_unwind(panic)
        }
    }
}

/// Resolve the configured database
pub fn get_database<C>(client: &C, settings: &Settings) -> Result<DatabaseHandle>
where
    C: DocumentClient + ?Sized,
{
    debug!(database = %settings.cosmos_database_name, "Resolving database");
    client.database(&settings.cosmos_database_name)
}

/// Resolve a container within the configured database
pub fn get_container<C>(client: &C, settings: &Settings, container_name: &str) -> Result<ContainerHandle>
where
    C: DocumentClient + ?Sized,
{
    let database = get_database(client, settings)?;
    debug!(database = %database.id(), container = %container_name, "Resolving container");
    client.container(&database, container_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const SECRET: &str =
        "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=c2VjcmV0LWtleQ==;";

    /// Records every call and fails on demand
    #[derive(Default)]
    struct FaultyClient {
        closes: Arc<AtomicUsize>,
        requested: Arc<Mutex<Vec<String>>>,
        fail_database: bool,
        fail_close: bool,
    }

    #[async_trait]
    impl DocumentClient for FaultyClient {
        fn database(&self, id: &str) -> Result<DatabaseHandle> {
            self.requested.lock().unwrap().push(format!("db:{id}"));
            if self.fail_database {
                return Err(ClientError::InvalidResourceId {
                    kind: "database",
                    id: id.to_string(),
                    reason: "injected",
                });
            }
            DatabaseHandle::new(id)
        }

        fn container(&self, database: &DatabaseHandle, name: &str) -> Result<ContainerHandle> {
            self.requested.lock().unwrap().push(format!("container:{name}"));
            ContainerHandle::new(database, name)
        }

        async fn close(&self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                return Err(ClientError::Closed);
            }
            Ok(())
        }
    }

    fn settings(database: Option<&str>) -> Settings {
        let mut env = vec![("COSMOS_CONNECTION_STRING".to_string(), SECRET.to_string())];
        if let Some(db) = database {
            env.push(("COSMOS_DATABASE_NAME".to_string(), db.to_string()));
        }
        Settings::from_sources(Vec::new(), env).unwrap()
    }

    #[tokio::test]
    async fn closes_once_on_success() {
        let client = FaultyClient::default();
        let closes = client.closes.clone();
        let settings = settings(None);

        let container = scoped(client, move |c| {
            Box::pin(async move { get_container(c, &settings, "documents") })
        })
        .await
        .unwrap();

        assert_eq!(container.link(), "dbs/doc-manager/colls/documents");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn closes_once_when_resolution_fails() {
        let client = FaultyClient {
            fail_database: true,
            ..Default::default()
        };
        let closes = client.closes.clone();
        let requested = client.requested.clone();
        let settings = settings(None);

        let err = scoped(client, move |c| {
            Box::pin(async move { get_container(c, &settings, "documents") })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::InvalidResourceId { reason: "injected", .. }));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        // The container was never requested once the database failed
        assert_eq!(*requested.lock().unwrap(), vec!["db:doc-manager".to_string()]);
    }

    #[tokio::test]
    async fn body_error_wins_over_close_error() {
        let client = FaultyClient {
            fail_database: true,
            fail_close: true,
            ..Default::default()
        };
        let closes = client.closes.clone();
        let settings = settings(None);

        let err = scoped(client, move |c| {
            Box::pin(async move { get_database(c, &settings) })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::InvalidResourceId { .. }));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn close_error_surfaces_after_success() {
        let client = FaultyClient {
            fail_close: true,
            ..Default::default()
        };
        let settings = settings(None);

        let err = scoped(client, move |c| {
            Box::pin(async move { get_database(c, &settings) })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Closed));
    }

    #[tokio::test]
    async fn closes_once_when_body_panics() {
        let client = FaultyClient::default();
        let closes = client.closes.clone();

        let scope = scoped(client, |_c| {
            Box::pin(async move {
                if true {
                    panic!("boom");
                }
                Ok::<(), ClientError>(())
            })
        });
        let result = AssertUnwindSafe(scope).catch_unwind().await;

        assert!(result.is_err());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn configured_database_name_is_requested() {
        let client = FaultyClient::default();
        let requested = client.requested.clone();
        let settings = settings(Some("inventory"));

        let db = scoped(client, move |c| {
            Box::pin(async move { get_database(c, &settings) })
        })
        .await
        .unwrap();

        assert_eq!(db.id(), "inventory");
        assert_eq!(*requested.lock().unwrap(), vec!["db:inventory".to_string()]);
    }

    #[tokio::test]
    async fn caller_error_types_pass_through() {
        #[derive(Debug)]
        enum AppError {
            Client(ClientError),
            NotReady,
        }

        impl From<ClientError> for AppError {
            fn from(e: ClientError) -> Self {
                Self::Client(e)
            }
        }

        let client = FaultyClient::default();
        let closes = client.closes.clone();

        let err = scoped(client, |_c| {
            Box::pin(async move { Err::<(), _>(AppError::NotReady) })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotReady));
        assert_eq!(closes.load(Ordering::SeqCst), 1);

        let failing = FaultyClient {
            fail_close: true,
            ..Default::default()
        };
        let err = scoped(failing, |_c| Box::pin(async move { Ok::<_, AppError>(()) }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Client(ClientError::Closed)));
    }

    #[tokio::test]
    async fn with_client_opens_and_closes_cosmos_client() {
        let settings = settings(Some("inventory"));
        let owned = settings.clone();

        let link = with_client(&settings, move |client| {
            Box::pin(async move {
                let container = get_container(client, &owned, "documents")?;
                Ok::<_, ClientError>(client.resource_url(&container.link())?.to_string())
            })
        })
        .await
        .unwrap();

        assert_eq!(
            link,
            "https://acct.documents.azure.com/dbs/inventory/colls/documents"
        );
    }

    #[tokio::test]
    async fn with_client_rejects_bad_secret_before_running_body() {
        let settings = Settings::from_sources(
            Vec::new(),
            vec![("COSMOS_CONNECTION_STRING".to_string(), "not-a-connection-string".to_string())],
        )
        .unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_in_body = ran.clone();

        let err = with_client(&settings, move |_client| {
            Box::pin(async move {
                ran_in_body.fetch_add(1, Ordering::SeqCst);
                Ok::<(), ClientError>(())
            })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::ConnectionString { .. }));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }
}
