//! In-memory backend.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use parking_lot::RwLock;

use crate::error::{Result, StorageError};
use crate::{ObjectStore, ObjectStream};

/// Chunk size used when streaming stored objects.
const CHUNK_SIZE: usize = 64 * 1024;

/// [`ObjectStore`] holding objects in a shared map. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    container: String,
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryStore {
    pub fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            objects: Arc::default(),
        }
    }

    /// Store (or replace) an object.
    pub fn insert(&self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.objects.write().insert(name.into(), data.into());
    }

    pub fn remove(&self, name: &str) -> Option<Bytes> {
        self.objects.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    fn get(&self, name: &str) -> Result<Bytes> {
        self.objects
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    fn container(&self) -> &str {
        &self.container
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.objects.read().contains_key(name))
    }

    async fn download(&self, name: &str) -> Result<Bytes> {
        self.get(name)
    }

    async fn open_read(&self, name: &str) -> Result<ObjectStream> {
        let data = self.get(name)?;
        let len = data.len();
        let chunks: Vec<std::io::Result<Bytes>> = (0..len)
            .step_by(CHUNK_SIZE)
            .map(|start| Ok(data.slice(start..(start + CHUNK_SIZE).min(len))))
            .collect();
        Ok(ObjectStream {
            content_length: Some(len as u64),
            body: futures::stream::iter(chunks).boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_and_read_back() {
        let store = MemoryStore::new("videos");
        assert!(store.is_empty());
        store.insert("demo.m3u8", "#EXTM3U\n");
        assert_eq!(store.len(), 1);
        assert!(store.exists("demo.m3u8").await.unwrap());
        assert!(!store.exists("other.m3u8").await.unwrap());
        assert_eq!(store.download("demo.m3u8").await.unwrap(), Bytes::from("#EXTM3U\n"));
    }

    #[tokio::test]
    async fn open_read_chunks_large_objects() {
        let store = MemoryStore::new("videos");
        let payload = vec![7u8; CHUNK_SIZE * 2 + 10];
        store.insert("big.ts", payload.clone());

        let stream = store.open_read("big.ts").await.unwrap();
        assert_eq!(stream.content_length, Some(payload.len() as u64));
        let chunks: Vec<Bytes> = stream.body.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), payload);
    }

    #[tokio::test]
    async fn clones_share_objects() {
        let store = MemoryStore::new("videos");
        let clone = store.clone();
        clone.insert("a.ts", "x");
        assert!(store.exists("a.ts").await.unwrap());
        assert_eq!(store.remove("a.ts"), Some(Bytes::from("x")));
        assert!(matches!(store.download("a.ts").await, Err(StorageError::NotFound(_))));
    }
}
