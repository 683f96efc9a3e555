//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<Response, ApiError>`; every failure becomes one
//! plain-text response built in a single place, so a status line can never
//! be paired with the body of another outcome.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use hlsgate_common::Error;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct ApiError {
    inner: Error,
    expose_details: bool,
}

impl ApiError {
    pub fn new(inner: Error) -> Self {
        Self {
            inner,
            expose_details: false,
        }
    }

    /// Include the error text in server-error bodies.
    pub fn with_details(mut self, expose: bool) -> Self {
        self.expose_details = expose;
        self
    }

    pub fn inner(&self) -> &Error {
        &self.inner
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in request handler"
            );
            if self.expose_details {
                format!("Internal server error: {}", self.inner)
            } else {
                "Internal server error".to_string()
            }
        } else {
            self.inner.to_string()
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}
