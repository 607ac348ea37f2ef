//! In-memory storage backend

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::Result;

use super::StorageBackend;

/// Process-local storage. Contents are lost on shutdown.
#[derive(Default)]
pub struct MemoryStorage {
    objects: DashMap<String, Bytes>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.objects.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        self.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.contains_key(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let dir = format!("{}/", prefix.trim_end_matches('/'));
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| {
                key.strip_prefix(&dir)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();

        storage.put("orders/a.json", Bytes::from("1")).await.unwrap();
        storage.put("orders/b.json", Bytes::from("2")).await.unwrap();
        storage.put("ordersx/c.json", Bytes::from("3")).await.unwrap();
        storage.put("orders/nested/d.json", Bytes::from("4")).await.unwrap();

        assert!(storage.exists("orders/a.json").await.unwrap());
        assert_eq!(
            storage.get("orders/b.json").await.unwrap(),
            Some(Bytes::from("2"))
        );
        assert!(storage.get("orders/zzz.json").await.unwrap().is_none());

        let keys = storage.list("orders").await.unwrap();
        assert_eq!(keys, vec!["orders/a.json", "orders/b.json"]);
    }
}
