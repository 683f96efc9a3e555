//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds an [`AppContext`] over an in-memory
//! object store. The [`TestHarness::with_server`] constructor starts Axum on
//! a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use tower::ServiceExt;

use hlsgate::config::Config;
use hlsgate::server::{create_router, AppContext};
use hlsgate_storage::{MemoryStore, ObjectStore, ObjectStream, StorageError};

/// Playlist used by most tests.
pub const SAMPLE_PLAYLIST: &str = "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\nsample0.ts\n#EXTINF:10,\nsample1.ts\n#EXT-X-ENDLIST\n";

/// Test harness wrapping an [`AppContext`] backed by a [`MemoryStore`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub store: MemoryStore,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        let store = MemoryStore::new(&config.storage.container);
        let ctx = AppContext::new(config, Arc::new(store.clone()));
        Self { ctx, store }
    }

    /// Create a harness whose store fails every call.
    pub fn failing(config: Config) -> Self {
        let store = MemoryStore::new(&config.storage.container);
        let ctx = AppContext::new(config, Arc::new(FailingStore));
        Self { ctx, store }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    /// Issue a GET with a `Host` header through the router.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(
            Request::get(uri)
                .header("host", "host.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

/// Collect a response body.
pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Collect a response body as UTF-8.
pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

/// Store whose service is always unavailable.
struct FailingStore;

#[async_trait::async_trait]
impl ObjectStore for FailingStore {
    fn container(&self) -> &str {
        "videos"
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        Err(StorageError::Status {
            status: 503,
            name: name.to_string(),
        })
    }

    async fn download(&self, name: &str) -> Result<Bytes, StorageError> {
        Err(StorageError::Timeout(name.to_string()))
    }

    async fn open_read(&self, name: &str) -> Result<ObjectStream, StorageError> {
        Err(StorageError::Timeout(name.to_string()))
    }
}
