//! HLS media types and file extensions.

/// Content type of an HLS playlist.
pub const PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// Content type of an MPEG transport-stream segment.
pub const SEGMENT_CONTENT_TYPE: &str = "video/MP2T";

/// Content type of a progressive MP4 video.
pub const MP4_CONTENT_TYPE: &str = "video/mp4";

/// Extension (without the dot) of playlist objects.
pub const PLAYLIST_EXTENSION: &str = "m3u8";

/// Extension (with the dot) that marks a manifest line as a segment reference.
pub const SEGMENT_SUFFIX: &str = ".ts";

/// Check whether `name` ends with the segment suffix, ignoring ASCII case.
///
/// ```
/// use hlsgate_common::media::has_segment_suffix;
///
/// assert!(has_segment_suffix("sample0.ts"));
/// assert!(has_segment_suffix("SAMPLE0.TS"));
/// assert!(!has_segment_suffix("sample0.tsx"));
/// ```
pub fn has_segment_suffix(name: &str) -> bool {
    let suffix = SEGMENT_SUFFIX.as_bytes();
    let bytes = name.as_bytes();
    bytes.len() >= suffix.len() && bytes[bytes.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_suffix_is_case_insensitive() {
        assert!(has_segment_suffix("a.ts"));
        assert!(has_segment_suffix("a.Ts"));
        assert!(has_segment_suffix(".ts"));
    }

    #[test]
    fn segment_suffix_rejects_other_extensions() {
        assert!(!has_segment_suffix("a.m3u8"));
        assert!(!has_segment_suffix("ts"));
        assert!(!has_segment_suffix(""));
        assert!(!has_segment_suffix("a.ts "));
        // Multi-byte characters before the suffix must not trip slicing.
        assert!(has_segment_suffix("séance.ts"));
        assert!(!has_segment_suffix("é"));
    }
}
