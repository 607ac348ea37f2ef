//! Document store
//!
//! Typed collections of JSON documents on top of a [`StorageBackend`]. Each
//! document is stored under `<collection>/<id>.json` together with its
//! assigned id and creation time.

use bytes::Bytes;
use std::sync::Arc;

use crate::storage::{create_storage, StorageBackend, StorageConfig};
use crate::types::{DocId, Document, Stored};
use crate::{Error, Result};

pub mod query;

pub use query::DocumentQuery;

const PROBE_KEY: &str = ".connection";

/// Document store over a storage backend
pub struct DocumentStore {
    storage: Arc<dyn StorageBackend>,
}

impl DocumentStore {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    fn key<T: Document>(id: &DocId) -> String {
        format!("{}/{}.json", T::COLLECTION, id)
    }

    /// Persist a new document, assigning its identity
    pub async fn insert<T: Document>(&self, document: T) -> Result<Stored<T>> {
        let stored = Stored::new(document);
        let data = serde_json::to_vec(&stored)?;

        self.storage
            .put(&Self::key::<T>(&stored.id), Bytes::from(data))
            .await?;

        tracing::debug!(collection = T::COLLECTION, id = %stored.id, "Inserted document");
        Ok(stored)
    }

    /// Fetch a document by id
    pub async fn get<T: Document>(&self, id: DocId) -> Result<Option<Stored<T>>> {
        match self.storage.get(&Self::key::<T>(&id)).await? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Return every document in the collection matching `query`,
    /// oldest first
    pub async fn find<T: Document>(&self, query: &DocumentQuery) -> Result<Vec<Stored<T>>> {
        let keys = self.storage.list(T::COLLECTION).await?;
        let mut results = Vec::new();

        for key in keys {
            if !key.ends_with(".json") {
                continue;
            }

            // Key vanished after listing
            let Some(data) = self.storage.get(&key).await? else {
                continue;
            };

            let value: serde_json::Value = serde_json::from_slice(&data)?;
            if !query.is_empty() && !query.matches(&value) {
                continue;
            }

            let stored: Stored<T> = serde_json::from_value(value)
                .map_err(|e| Error::storage(format!("corrupt document '{}': {}", key, e)))?;
            results.push(stored);
        }

        results.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(results)
    }

    /// Write and read back a marker to confirm the backend is reachable
    /// and writable
    pub async fn ping(&self) -> Result<()> {
        let marker = Bytes::from(chrono::Utc::now().to_rfc3339());
        self.storage.put(PROBE_KEY, marker.clone()).await?;

        match self.storage.get(PROBE_KEY).await? {
            Some(read) if read == marker => Ok(()),
            _ => Err(Error::storage("connection marker did not read back")),
        }
    }
}

/// Outcome of connecting to the store at startup
#[derive(Clone)]
pub enum ConnectionState {
    Connected(Arc<DocumentStore>),
    Failed { reason: String },
}

impl ConnectionState {
    /// The store handle, or [`Error::Unavailable`] if the connection failed
    pub fn store(&self) -> Result<&Arc<DocumentStore>> {
        match self {
            ConnectionState::Connected(store) => Ok(store),
            ConnectionState::Failed { reason } => Err(Error::Unavailable(reason.clone())),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    /// Human readable status for health reporting
    pub fn describe(&self) -> String {
        match self {
            ConnectionState::Connected(_) => "connected".to_string(),
            ConnectionState::Failed { reason } => format!("unavailable: {}", reason),
        }
    }
}

impl std::fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Open the store once. Failures are logged and returned as
/// [`ConnectionState::Failed`]; nothing is retried.
pub async fn connect(config: StorageConfig) -> ConnectionState {
    match create_storage(config) {
        Ok(storage) => connect_with(Arc::from(storage)).await,
        Err(err) => {
            tracing::error!(error = %err, "Store connection failed");
            ConnectionState::Failed {
                reason: err.to_string(),
            }
        }
    }
}

/// Verify an already constructed backend and wrap it as a connection
pub async fn connect_with(storage: Arc<dyn StorageBackend>) -> ConnectionState {
    let store = DocumentStore::new(storage);
    match store.ping().await {
        Ok(()) => {
            tracing::info!("Store connection established");
            ConnectionState::Connected(Arc::new(store))
        }
        Err(err) => {
            tracing::error!(error = %err, "Store connection failed");
            ConnectionState::Failed {
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use crate::types::{Delivery, Pizza};

    fn memory_store() -> DocumentStore {
        DocumentStore::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = memory_store();
        let stored = store
            .insert(Delivery {
                time: "10:00".into(),
                driver: "Sam".into(),
            })
            .await
            .unwrap();

        let fetched: Stored<Delivery> = store.get(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = memory_store();
        let missing: Option<Stored<Pizza>> = store.get(uuid::Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let store = memory_store();
        store.insert(Pizza::default()).await.unwrap();

        let deliveries: Vec<Stored<Delivery>> = store.find(&DocumentQuery::all()).await.unwrap();
        assert!(deliveries.is_empty());

        let pizzas: Vec<Stored<Pizza>> = store.find(&DocumentQuery::all()).await.unwrap();
        assert_eq!(pizzas.len(), 1);
    }

    #[tokio::test]
    async fn test_find_filters_and_orders() {
        let store = memory_store();
        for driver in ["Sam", "Alex", "Sam"] {
            store
                .insert(Delivery {
                    time: "noon".into(),
                    driver: driver.into(),
                })
                .await
                .unwrap();
        }

        let query = DocumentQuery::all().and("driver", "Sam").unwrap();
        let found: Vec<Stored<Delivery>> = store.find(&query).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|d| d.document.driver == "Sam"));
        assert!(found[0].created_at <= found[1].created_at);
    }

    #[tokio::test]
    async fn test_connect_memory() {
        let state = connect(StorageConfig::Memory).await;
        assert!(state.is_connected());
        assert_eq!(state.describe(), "connected");
        assert!(state.store().is_ok());
    }

    struct ReadOnlyStorage;

    #[async_trait::async_trait]
    impl StorageBackend for ReadOnlyStorage {
        async fn get(&self, _key: &str) -> Result<Option<Bytes>> {
            Ok(None)
        }

        async fn put(&self, key: &str, _data: Bytes) -> Result<()> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("read-only: {}", key),
            )))
        }

        async fn exists(&self, _key: &str) -> Result<bool> {
            Ok(true)
        }

        async fn list(&self, _prefix: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_read_only_backend() {
        let state = connect_with(Arc::new(ReadOnlyStorage)).await;
        assert!(!state.is_connected());
        assert!(state.describe().contains("read-only"));
    }

    #[tokio::test]
    async fn test_ping_writes_marker() {
        let storage = Arc::new(MemoryStorage::new());
        let store = DocumentStore::new(storage.clone());
        store.ping().await.unwrap();
        assert!(storage.exists(PROBE_KEY).await.unwrap());
    }

    #[test]
    fn test_failed_state_is_unavailable() {
        let state = ConnectionState::Failed {
            reason: "refused".into(),
        };
        assert!(!state.is_connected());
        assert!(matches!(state.store(), Err(Error::Unavailable(_))));
        assert_eq!(state.describe(), "unavailable: refused");
    }
}
