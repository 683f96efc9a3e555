//! Default progressive video: `GET /api/video`.

use axum::{extract::State, response::Response};
use hlsgate_common::media::MP4_CONTENT_TYPE;
use hlsgate_common::{Error, Result};

use super::{not_found_as, stream_response};
use crate::server::{ApiError, AppContext};

const VIDEO_NOT_FOUND: &str = "Video not found";

/// Stream the configured `storage.default_video` object as MP4.
pub async fn get_video(State(ctx): State<AppContext>) -> std::result::Result<Response, ApiError> {
    serve_video(&ctx).await.map_err(|e| ctx.api_error(e))
}

async fn serve_video(ctx: &AppContext) -> Result<Response> {
    let object = ctx.config.storage.default_video.as_str();
    tracing::info!(object, "Fetching default video");

    if !ctx.store.exists(object).await? {
        tracing::warn!(container = ctx.store.container(), object, "Video not found");
        return Err(Error::not_found(VIDEO_NOT_FOUND));
    }

    let stream = ctx
        .store
        .open_read(object)
        .await
        .map_err(not_found_as(VIDEO_NOT_FOUND))?;
    stream_response(stream, MP4_CONTENT_TYPE)
}
