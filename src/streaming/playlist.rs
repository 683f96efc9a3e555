//! Playlist handler and manifest rewriting.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use hlsgate_common::media::{has_segment_suffix, PLAYLIST_CONTENT_TYPE, PLAYLIST_EXTENSION};
use hlsgate_common::{encode_segment_token, Error, Result, VideoName};

use super::not_found_as;
use crate::server::{ApiError, AppContext, RequestBase};

const PLAYLIST_NOT_FOUND: &str = "Playlist not found";

/// Whether a manifest line names a transport-stream segment.
///
/// Directives (`#...`) never do; any other line does when its trimmed value
/// ends in `.ts`, ignoring case.
pub fn is_segment_reference(line: &str) -> bool {
    !line.starts_with('#') && has_segment_suffix(line.trim())
}

/// Rewrite every segment line of `manifest` to `{segment_base}{token}`.
///
/// Runs line by line: directive lines, blank lines and other URIs (variant
/// playlists, keys) are copied untouched, and each line keeps its original
/// terminator, so a file without a trailing newline stays without one.
///
/// # Examples
///
/// ```
/// use hlsgate::streaming::rewrite_manifest;
///
/// let out = rewrite_manifest("#EXTM3U\n#EXTINF:10,\nsample0.ts\n", "https://h/api/seg/demo/");
/// assert_eq!(out, "#EXTM3U\n#EXTINF:10,\nhttps://h/api/seg/demo/c2FtcGxlMC50cw%3D%3D\n");
/// ```
pub fn rewrite_manifest(manifest: &str, segment_base: &str) -> String {
    let mut out = String::with_capacity(manifest.len() * 2);
    for line in manifest.split_inclusive('\n') {
        let (content, terminator) = split_terminator(line);
        if is_segment_reference(content) {
            out.push_str(segment_base);
            out.push_str(&encode_segment_token(content.trim()));
            out.push_str(terminator);
        } else {
            out.push_str(line);
        }
    }
    out
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}

/// Serve a rewritten playlist: `GET /api/hls/{video}.m3u8`.
pub async fn get_playlist(
    State(ctx): State<AppContext>,
    Path(playlist): Path<String>,
    base: RequestBase,
) -> std::result::Result<Response, ApiError> {
    serve_playlist(&ctx, &playlist, &base)
        .await
        .map_err(|e| ctx.api_error(e))
}

async fn serve_playlist(ctx: &AppContext, playlist: &str, base: &RequestBase) -> Result<Response> {
    let raw_name = playlist
        .strip_suffix(PLAYLIST_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or_else(|| Error::not_found(PLAYLIST_NOT_FOUND))?;
    let video = VideoName::parse(raw_name)?;
    let object = video.manifest_object();

    tracing::info!(video = %video, "Fetching playlist");

    if !ctx.store.exists(&object).await? {
        tracing::warn!(container = ctx.store.container(), object = %object, "Playlist not found");
        return Err(Error::not_found(PLAYLIST_NOT_FOUND));
    }

    let data = ctx
        .store
        .download(&object)
        .await
        .map_err(not_found_as(PLAYLIST_NOT_FOUND))?;
    let manifest = std::str::from_utf8(&data)
        .map_err(|e| Error::internal(format!("Playlist {object} is not valid UTF-8: {e}")))?;

    let body = rewrite_manifest(manifest, &base.segment_base(&video));
    tracing::debug!(video = %video, bytes = body.len(), "Playlist rewritten");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE)
        .body(Body::from(body))
        .map_err(|e| Error::internal(format!("Failed to build response: {e}")))
}
