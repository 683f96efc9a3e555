//! HLS delivery handlers.
//!
//! Serves playlists and transport-stream segments stored in the object
//! store, rewriting playlists so every segment is fetched through this
//! server.
//!
//! # Routes
//!
//! - `GET /hls/{video}.m3u8` - Playlist with segment lines rewritten to tokens
//! - `GET /seg/{video}/{token}` - Segment bytes, streamed
//! - `GET /video` - Default progressive video, streamed

mod playlist;
mod segment;
mod video;

pub use playlist::{get_playlist, is_segment_reference, rewrite_manifest};
pub use segment::get_segment;
pub use video::get_video;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use hlsgate_common::{Error, Result};
use hlsgate_storage::{ObjectStream, StorageError};

use crate::server::AppContext;

/// Create the playlist/segment router (nested under `/api`).
pub fn streaming_routes() -> Router<AppContext> {
    Router::new()
        .route("/hls/:playlist", get(get_playlist))
        .route("/seg/:video/:segment", get(get_segment))
        .route("/video", get(get_video))
}

/// Map a store-level "not found" onto a handler-specific message.
fn not_found_as(message: &'static str) -> impl Fn(StorageError) -> Error {
    move |e| match e {
        StorageError::NotFound(_) => Error::not_found(message),
        other => other.into(),
    }
}

/// Build a response that forwards an object stream without buffering it.
fn stream_response(stream: ObjectStream, content_type: &'static str) -> Result<Response> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(len) = stream.content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }
    builder
        .body(Body::from_stream(stream.body))
        .map_err(|e| Error::internal(format!("Failed to build response: {e}")))
}
