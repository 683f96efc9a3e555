use std::fmt;
use std::time::Duration;

use hlsgate_storage::StorageSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Scheme used in rewritten playlist URLs when the request does not
    /// reveal one (`http` or `https`)
    #[serde(default = "default_scheme")]
    pub default_scheme: String,

    /// Fixed origin for rewritten playlist URLs, e.g. `https://cdn.example.com`.
    /// Overrides anything derived from the request.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Honour `X-Forwarded-Proto` / `X-Forwarded-Host` from a reverse proxy
    #[serde(default = "default_true")]
    pub trust_forwarded_headers: bool,

    /// Include error text in 500 responses (never enable in production)
    #[serde(default)]
    pub expose_error_details: bool,

    /// Allow cross-origin GETs so browser players on other origins can fetch
    #[serde(default = "default_true")]
    pub cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_scheme() -> String {
    "http".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_scheme: default_scheme(),
            public_base_url: None,
            trust_forwarded_headers: true,
            expose_error_details: false,
            cors: true,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Connection string for the object store (see `hlsgate_storage::ConnectionString`)
    #[serde(default)]
    pub connection_string: String,

    /// Container holding playlists and segments
    #[serde(default = "default_container")]
    pub container: String,

    /// Object served by `GET /api/video`
    #[serde(default = "default_video")]
    pub default_video: String,

    /// Seconds to wait for the store to connect and answer (0 disables)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_container() -> String {
    "videos".to_string()
}
fn default_video() -> String {
    "sample.mp4".to_string()
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            container: default_container(),
            default_video: default_video(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connection_string = if self.connection_string.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("StorageConfig")
            .field("connection_string", &connection_string)
            .field("container", &self.container)
            .field("default_video", &self.default_video)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl StorageSettings for StorageConfig {
    fn connection_string(&self) -> &str {
        &self.connection_string
    }

    fn container_name(&self) -> &str {
        &self.container
    }

    fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
