//! Shared Key request signing for the Blob service.
//!
//! The signature is `base64(HMAC-SHA256(account_key, string_to_sign))`, where
//! the string to sign is the verb, eleven standard header slots (all empty for
//! the bodiless GET/HEAD requests issued here), the canonicalized `x-ms-*`
//! headers and the canonicalized resource `/{account}{url_path}`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Result, StorageError};

type HmacSha256 = Hmac<Sha256>;

/// Blob service REST API version sent with every request.
pub const API_VERSION: &str = "2021-08-06";

/// Current time in the RFC 1123 form the service expects in `x-ms-date`.
pub fn rfc1123_now() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Build the string to sign for a bodiless request.
///
/// `ms_headers` are the `x-ms-*` headers being sent; they are lowercased and
/// sorted here.
pub fn string_to_sign(verb: &str, ms_headers: &[(&str, &str)], resource: &str) -> String {
    let mut headers: Vec<(String, &str)> = ms_headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::with_capacity(128 + resource.len());
    out.push_str(verb);
    out.push('\n');
    // Content-Encoding .. Range
    for _ in 0..11 {
        out.push('\n');
    }
    for (name, value) in headers {
        out.push_str(&name);
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }
    out.push_str(resource);
    out
}

/// Sign `string_to_sign` with the decoded account key.
pub fn sign(key: &[u8], string_to_sign: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StorageError::config(format!("invalid account key: {e}")))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// `Authorization` header value for a Shared Key request.
pub fn authorization(
    account: &str,
    key: &[u8],
    verb: &str,
    ms_headers: &[(&str, &str)],
    url_path: &str,
) -> Result<String> {
    let resource = format!("/{account}{url_path}");
    let signature = sign(key, &string_to_sign(verb, ms_headers, &resource))?;
    Ok(format!("SharedKey {account}:{signature}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "Mon, 01 Jan 2024 00:00:00 GMT";

    #[test]
    fn string_to_sign_layout() {
        let s = string_to_sign(
            "GET",
            &[("x-ms-version", API_VERSION), ("x-ms-date", DATE)],
            "/media/videos/demo.m3u8",
        );
        assert_eq!(
            s,
            format!(
                "GET\n\n\n\n\n\n\n\n\n\n\n\nx-ms-date:{DATE}\nx-ms-version:{API_VERSION}\n/media/videos/demo.m3u8"
            )
        );
    }

    #[test]
    fn headers_are_lowercased_and_sorted() {
        let s = string_to_sign("HEAD", &[("X-MS-Version", "v"), ("x-ms-Date", "d")], "/r");
        assert!(s.ends_with("x-ms-date:d\nx-ms-version:v\n/r"));
    }

    #[test]
    fn known_signature() {
        // HMAC-SHA256("secret", "GET\n") in base64.
        assert_eq!(
            sign(b"secret", "GET\n").unwrap(),
            "1dx0u09Yq+tveZeJ/1qHUSKwRxQNP8a8LZn+btJWhDA="
        );
    }

    #[test]
    fn authorization_header_shape() {
        let header = authorization(
            "media",
            b"secret",
            "HEAD",
            &[("x-ms-date", DATE), ("x-ms-version", API_VERSION)],
            "/videos/demo.m3u8",
        )
        .unwrap();
        assert!(header.starts_with("SharedKey media:"));
        let signature = header.trim_start_matches("SharedKey media:");
        assert_eq!(STANDARD.decode(signature).unwrap().len(), 32);
    }

    #[test]
    fn rfc1123_format() {
        let now = rfc1123_now();
        assert!(now.ends_with(" GMT"));
        assert_eq!(now.len(), DATE.len());
    }
}
