//! Public origin of an inbound request.
//!
//! Rewritten playlists point back at this server, so the scheme and host are
//! taken from the request rather than from a hardcoded address. Resolution
//! order:
//!
//! 1. `server.public_base_url`, when configured
//! 2. scheme/authority of an absolute request URI
//! 3. `X-Forwarded-Proto` / `X-Forwarded-Host`, when trusted
//! 4. `server.default_scheme` and the `Host` header

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Uri};
use hlsgate_common::{Error, Result, VideoName};

use crate::config::ServerConfig;
use crate::server::{error::ApiError, AppContext};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// `scheme://host[:port]` (plus any configured path prefix) of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBase {
    origin: String,
}

impl RequestBase {
    /// Use a fixed origin such as `https://cdn.example.com/media`.
    pub fn from_origin(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// Derive the origin from request parts.
    pub fn resolve(uri: &Uri, headers: &HeaderMap, server: &ServerConfig) -> Result<Self> {
        if let Some(base) = &server.public_base_url {
            return Ok(Self::from_origin(base));
        }

        let forwarded = |name: &str| {
            server
                .trust_forwarded_headers
                .then(|| first_header_value(headers, name))
                .flatten()
        };

        let scheme = uri
            .scheme_str()
            .map(str::to_ascii_lowercase)
            .or_else(|| forwarded(X_FORWARDED_PROTO).map(|s| s.to_ascii_lowercase()))
            .filter(|s| s == "http" || s == "https")
            .unwrap_or_else(|| server.default_scheme.clone());

        let host = uri
            .authority()
            .map(|a| match a.port_u16() {
                Some(port) => format!("{}:{port}", a.host()),
                None => a.host().to_string(),
            })
            .or_else(|| forwarded(X_FORWARDED_HOST))
            .or_else(|| first_header_value(headers, header::HOST.as_str()))
            .ok_or_else(|| Error::invalid_input("Missing Host header"))?;

        if !is_valid_host(&host) {
            return Err(Error::invalid_input("Invalid Host header"));
        }

        Ok(Self {
            origin: format!("{scheme}://{host}"),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Prefix that segment tokens for `video` are appended to.
    pub fn segment_base(&self, video: &VideoName) -> String {
        format!("{}/api/seg/{}/", self.origin, video)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for RequestBase {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> std::result::Result<Self, Self::Rejection> {
        Self::resolve(&parts.uri, &parts.headers, &ctx.config.server).map_err(|e| ctx.api_error(e))
    }
}

fn first_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Hosts may only carry name, IPv4/IPv6 and port characters.
fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b':' | b'[' | b']'))
}
