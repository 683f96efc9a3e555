//! Hlsgate-Storage: object storage backends.
//!
//! The HTTP front end never talks to a storage service directly; it holds an
//! [`ObjectStore`] bound to one container and asks it three questions: does an
//! object exist, what are its full contents, and give me a stream of its
//! bytes. Which backend answers is decided by the connection string:
//!
//! - **Azure Blob Storage** (`AccountName=...;AccountKey=...`,
//!   `BlobEndpoint=...;SharedAccessSignature=...`, `UseDevelopmentStorage=true`)
//! - **Local filesystem** (`UseLocalFilesystem=true;Root=/srv/media`)
//! - **Memory** ([`MemoryStore`], for tests and demos)

pub mod azure;
pub mod connection;
pub mod error;
pub mod local;
pub mod memory;

pub use azure::AzureBlobStore;
pub use connection::{ConnectionString, StoreKind};
pub use error::{Result, StorageError};
pub use local::LocalStore;
pub use memory::MemoryStore;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;

/// Storage settings handed to a backend at construction time.
pub trait StorageSettings {
    /// Connection string selecting and configuring the backend.
    fn connection_string(&self) -> &str;

    /// Container that holds playlists and segments.
    fn container_name(&self) -> &str;

    /// Upper bound on connecting to the service and receiving response headers.
    fn request_timeout(&self) -> Option<Duration> {
        None
    }
}

/// A streamed object body.
pub struct ObjectStream {
    /// Object size in bytes, when the backend knows it up front.
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, std::io::Result<Bytes>>,
}

impl std::fmt::Debug for ObjectStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStream")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Read access to the objects of a single container.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the container this store reads from.
    fn container(&self) -> &str;

    /// Check whether an object exists.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Download an object's full contents.
    async fn download(&self, name: &str) -> Result<Bytes>;

    /// Open a streamed read of an object.
    async fn open_read(&self, name: &str) -> Result<ObjectStream>;
}

/// Build the backend described by `settings`.
pub fn open_store(settings: &dyn StorageSettings) -> Result<Arc<dyn ObjectStore>> {
    let container = settings.container_name();
    if container.is_empty() {
        return Err(StorageError::config("container name is empty"));
    }

    let parsed = ConnectionString::parse(settings.connection_string())?;
    let store: Arc<dyn ObjectStore> = match parsed.kind()? {
        StoreKind::Azure(account) => Arc::new(AzureBlobStore::new(
            account,
            container,
            settings.request_timeout(),
        )?),
        StoreKind::Local(root) => Arc::new(LocalStore::new(root, container)),
    };

    tracing::info!(container, backend = parsed.backend_name(), "Object store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Settings(&'static str, &'static str);

    impl StorageSettings for Settings {
        fn connection_string(&self) -> &str {
            self.0
        }
        fn container_name(&self) -> &str {
            self.1
        }
    }

    #[test]
    fn opens_local_store() {
        let store = open_store(&Settings("UseLocalFilesystem=true;Root=/tmp", "videos")).unwrap();
        assert_eq!(store.container(), "videos");
    }

    #[test]
    fn opens_azure_store() {
        let store = open_store(&Settings("UseDevelopmentStorage=true", "videos")).unwrap();
        assert_eq!(store.container(), "videos");
    }

    #[test]
    fn rejects_empty_container() {
        assert!(matches!(
            open_store(&Settings("UseDevelopmentStorage=true", "")),
            Err(StorageError::Config(_))
        ));
    }

    #[test]
    fn rejects_empty_connection_string() {
        assert!(matches!(
            open_store(&Settings("", "videos")),
            Err(StorageError::Config(_))
        ));
    }
}
