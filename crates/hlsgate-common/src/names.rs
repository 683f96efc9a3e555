//! Validated names for the objects a request may touch.
//!
//! Both names end up inside storage object keys, so they are checked
//! against an allow-list before any lookup happens:
//!
//! - [`VideoName`]: 1–128 bytes of `[A-Za-z0-9._-]`, not starting with `.`.
//! - [`SegmentName`]: a relative object path ending in `.ts`, with no `.`/`..`
//!   components, backslashes or control characters.

use std::fmt;

use crate::error::{Error, Result};
use crate::media::{has_segment_suffix, PLAYLIST_EXTENSION};

/// Longest accepted video identifier, in bytes.
pub const MAX_VIDEO_NAME_LEN: usize = 128;

/// Longest accepted segment object name, in bytes (Azure's blob name limit).
pub const MAX_SEGMENT_NAME_LEN: usize = 1024;

/// A caller-supplied video identifier that is safe to embed in object names
/// and URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoName(String);

impl VideoName {
    /// Validate a raw identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use hlsgate_common::names::VideoName;
    ///
    /// assert!(VideoName::parse("big_buck-bunny.1080p").is_ok());
    /// assert!(VideoName::parse("../secrets").is_err());
    /// assert!(VideoName::parse("a/b").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_input("Video name must not be empty"));
        }
        if raw.len() > MAX_VIDEO_NAME_LEN {
            return Err(Error::invalid_input(format!(
                "Video name exceeds {MAX_VIDEO_NAME_LEN} bytes"
            )));
        }
        if raw.starts_with('.') {
            return Err(Error::invalid_input("Video name must not start with '.'"));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
        {
            return Err(Error::invalid_input(
                "Video name may only contain letters, digits, '.', '_' and '-'",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage object holding this video's playlist: `{video}.m3u8`.
    pub fn manifest_object(&self) -> String {
        format!("{}.{}", self.0, PLAYLIST_EXTENSION)
    }
}

impl fmt::Display for VideoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A segment object name recovered from a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentName(String);

impl SegmentName {
    /// Validate a decoded object name.
    ///
    /// ```
    /// use hlsgate_common::names::SegmentName;
    ///
    /// assert!(SegmentName::parse("720p/sample0.ts").is_ok());
    /// assert!(SegmentName::parse("demo.m3u8").is_err());
    /// assert!(SegmentName::parse("../other/sample0.ts").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_input("Segment name must not be empty"));
        }
        if raw.len() > MAX_SEGMENT_NAME_LEN {
            return Err(Error::invalid_input(format!(
                "Segment name exceeds {MAX_SEGMENT_NAME_LEN} bytes"
            )));
        }
        if !has_segment_suffix(raw) {
            return Err(Error::invalid_input("Not a transport-stream segment"));
        }
        if raw.starts_with('/') || raw.contains('\\') || raw.chars().any(char::is_control) {
            return Err(Error::invalid_input("Segment name is not a relative object path"));
        }
        if raw.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
            return Err(Error::invalid_input("Segment name contains an invalid path component"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
