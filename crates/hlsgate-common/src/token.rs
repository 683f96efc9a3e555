//! Opaque segment tokens.
//!
//! A segment token carries a storage object name inside a single URL path
//! segment. The name is base64-encoded (standard alphabet, padded) and the
//! result is percent-encoded, so `+`, `/` and `=` never reach the path
//! verbatim:
//!
//! ```text
//! sample0.ts  ->  c2FtcGxlMC50cw==  ->  c2FtcGxlMC50cw%3D%3D
//! ```
//!
//! Decoding reverses both steps and rejects anything that is not valid
//! percent-encoding, valid base64, or valid UTF-8.

use base64::{engine::general_purpose::STANDARD, Engine as _};

const HEX: [u8; 16] = *b"0123456789ABCDEF";

/// Reasons a segment token cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A `%` escape was truncated or not followed by two hex digits.
    #[error("malformed percent-encoding at byte {position}")]
    InvalidPercentEncoding { position: usize },

    /// The unescaped token is not valid base64.
    #[error("malformed base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded bytes are not UTF-8.
    #[error("object name is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Encode a storage object name into a URL-path-safe token.
///
/// # Examples
///
/// ```
/// use hlsgate_common::token::encode_segment_token;
///
/// assert_eq!(encode_segment_token("sample0.ts"), "c2FtcGxlMC50cw%3D%3D");
/// ```
pub fn encode_segment_token(object_name: &str) -> String {
    percent_encode(&STANDARD.encode(object_name.as_bytes()))
}

/// Decode a token produced by [`encode_segment_token`] back into the object name.
///
/// Lowercase hex escapes (`%2f`) are accepted, as are tokens that have
/// already been percent-decoded once by the router.
pub fn decode_segment_token(token: &str) -> Result<String, DecodeError> {
    let unescaped = percent_decode(token)?;
    let raw = STANDARD.decode(unescaped)?;
    Ok(String::from_utf8(raw)?)
}

/// Percent-encode every byte outside the RFC 3986 unreserved set.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

/// Percent-encode each `/`-separated component of an object path, keeping
/// the separators.
///
/// ```
/// use hlsgate_common::token::percent_encode_path;
///
/// assert_eq!(percent_encode_path("720p/seg 0.ts"), "720p/seg%200.ts");
/// ```
pub fn percent_encode_path(path: &str) -> String {
    path.split('/')
        .map(percent_encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode `%XX` escapes. Bytes other than `%` pass through unchanged.
pub fn percent_decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
            let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
            match (hi, lo) {
                (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                _ => return Err(DecodeError::InvalidPercentEncoding { position: i }),
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
