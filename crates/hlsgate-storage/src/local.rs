//! Local filesystem backend.
//!
//! Containers are directories under a root; object names map onto relative
//! paths below the container directory. Streamed reads go through
//! [`ReaderStream`] so large segments never sit in memory whole.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use futures::StreamExt;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::error::{Result, StorageError};
use crate::{ObjectStore, ObjectStream};

/// [`ObjectStore`] reading from `{root}/{container}/{name}`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    container: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, container: &str) -> Self {
        Self {
            root: root.into(),
            container: container.to_string(),
        }
    }

    /// Map an object name onto a path, refusing anything that would leave
    /// the container directory.
    fn object_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = name.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(&self.container).join(relative))
    }
}

fn not_found_or(e: std::io::Error, name: &str) -> StorageError {
    if e.kind() == ErrorKind::NotFound {
        StorageError::NotFound(name.to_string())
    } else {
        StorageError::Io(e)
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    fn container(&self) -> &str {
        &self.container
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let path = self.object_path(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn download(&self, name: &str) -> Result<Bytes> {
        let path = self.object_path(name)?;
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| not_found_or(e, name))?;
        Ok(Bytes::from(data))
    }

    async fn open_read(&self, name: &str) -> Result<ObjectStream> {
        let path = self.object_path(name)?;
        let file = File::open(&path).await.map_err(|e| not_found_or(e, name))?;
        let metadata = file.metadata().await?;
        Ok(ObjectStream {
            content_length: Some(metadata.len()),
            body: ReaderStream::new(file).boxed(),
        })
    }
}
