//! Response construction: error mapping, cache headers, ETags.
//!
//! Every error surfaces to the client as a generic status-coded body;
//! internal detail (paths, rejection sub-reason, IO errors) stays in the
//! server-side logs.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::schema::CacheConfig;
use crate::content::PathRejection;

/// Everything that can go wrong while serving a request.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("rate limit exceeded")]
    RateLimitExceeded,
    #[error("path rejected: {0}")]
    PathRejected(#[from] PathRejection),
    #[error("file not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("file read failed: {0}")]
    ReadFailure(#[source] std::io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServeError::PathRejected(_) => StatusCode::FORBIDDEN,
            ServeError::NotFound => StatusCode::NOT_FOUND,
            ServeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServeError::ReadFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        match self {
            ServeError::RateLimitExceeded => {
                (self.status(), "Too many requests, slow down").into_response()
            }
            // Generic body regardless of which path check failed.
            ServeError::PathRejected(_) => (self.status(), "Access denied").into_response(),
            ServeError::NotFound => not_found(),
            ServeError::MethodNotAllowed => {
                (self.status(), "Method not allowed").into_response()
            }
            ServeError::ReadFailure(_) => {
                (self.status(), "Internal server error").into_response()
            }
        }
    }
}

/// Generic HTML 404 body; reveals nothing about the document root.
fn not_found() -> Response {
    const BODY: &str = "<!doctype html>\
        <html><head><title>Not Found</title></head>\
        <body><h1>404</h1><p>The requested document does not exist.</p></body></html>";
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html")],
        BODY,
    )
        .into_response()
}

/// Strong content-derived ETag: hex SHA-256 of the body, quoted.
/// Deterministic, so the same asset always revalidates.
pub fn compute_etag(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("\"{:x}\"", hasher.finalize())
}

/// Cache-Control value for a non-HTML content type: short TTL for
/// scripts/styles, longer for other static assets.
pub fn cache_control(content_type: &str, cache: &CacheConfig) -> String {
    let max_age = match content_type {
        "text/javascript" | "text/css" => cache.script_style_max_age_secs,
        _ => cache.asset_max_age_secs,
    };
    format!("public, max-age={max_age}")
}

/// Cache-Control for HTML: always revalidated, never stored.
pub const HTML_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";
