use crate::config::Config;
use crate::streaming;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use hlsgate_storage::ObjectStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod request_base;

pub use error::ApiError;
pub use request_base::RequestBase;

/// Shared application context
///
/// Holds only immutable configuration and the store handle; requests share
/// no mutable state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub store: Arc<dyn ObjectStore>,
}

impl AppContext {
    pub fn new(config: Config, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Wrap an error for the HTTP layer, honouring `expose_error_details`.
    pub fn api_error(&self, e: hlsgate_common::Error) -> ApiError {
        ApiError::new(e).with_details(self.config.server.expose_error_details)
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors_enabled = ctx.config.server.cors;

    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Playlist, segment and video routes
        .nest("/api", streaming::streaming_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
            .allow_headers([header::RANGE]);
        app.layer(cors)
    } else {
        app
    }
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let store = hlsgate_storage::open_store(&config.storage)
        .context("Failed to open object store")?;

    let ctx = AppContext::new(config, store);
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
