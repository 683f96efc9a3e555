//! Segment handler: token → object name → streamed bytes.

use axum::{
    extract::{Path, State},
    response::Response,
};
use hlsgate_common::media::SEGMENT_CONTENT_TYPE;
use hlsgate_common::{decode_segment_token, Error, Result, SegmentName, VideoName};

use super::{not_found_as, stream_response};
use crate::server::{ApiError, AppContext};

const SEGMENT_NOT_FOUND: &str = "Segment not found";

/// Serve one segment: `GET /api/seg/{video}/{token}`.
///
/// The video name is validated and logged but not used to locate the
/// object; the token alone names it.
pub async fn get_segment(
    State(ctx): State<AppContext>,
    Path((video, token)): Path<(String, String)>,
) -> std::result::Result<Response, ApiError> {
    serve_segment(&ctx, &video, &token)
        .await
        .map_err(|e| ctx.api_error(e))
}

async fn serve_segment(ctx: &AppContext, video: &str, token: &str) -> Result<Response> {
    let video = VideoName::parse(video)?;
    let name = decode_segment_token(token).map_err(|e| {
        tracing::debug!(video = %video, token, error = %e, "Rejected segment token");
        Error::from(e)
    })?;
    let segment = SegmentName::parse(&name)?;

    tracing::info!(video = %video, segment = %segment, "Fetching segment");

    if !ctx.store.exists(segment.as_str()).await? {
        tracing::warn!(
            container = ctx.store.container(),
            segment = %segment,
            "Segment not found"
        );
        return Err(Error::not_found(SEGMENT_NOT_FOUND));
    }

    let stream = ctx
        .store
        .open_read(segment.as_str())
        .await
        .map_err(not_found_as(SEGMENT_NOT_FOUND))?;
    tracing::debug!(segment = %segment, length = ?stream.content_length, "Streaming segment");

    stream_response(stream, SEGMENT_CONTENT_TYPE)
}
