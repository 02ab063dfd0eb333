//! Request dispatcher.
//!
//! One handler serves every path. Per request: method gate (the rate
//! limiter and security headers run as middleware around this), path
//! validation, existence check, MIME resolution, file read, and response
//! write with the correct caching/CSP treatment.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::content::{mime, PathRejection};
use crate::http::response::{self, ServeError};
use crate::http::server::AppState;
use crate::security::csp;

/// Serve a static asset.
pub async fn serve_asset(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let client = addr.ip();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // CORS preflight short-circuits; the header middleware attaches the
    // Access-Control-Allow-Origin echo on the way out.
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::GET && method != Method::POST {
        tracing::warn!(client = %client, method = %method, path = %path, "Method not allowed");
        return ServeError::MethodNotAllowed.into_response();
    }

    let resolved = match state.paths.validate(&path) {
        Ok(resolved) => resolved,
        Err(reason) => {
            tracing::warn!(client = %client, path = %path, reason = %reason, "Path rejected");
            return ServeError::PathRejected(reason).into_response();
        }
    };

    match tokio::fs::metadata(&resolved).await {
        Ok(meta) if meta.is_file() => {}
        _ => {
            tracing::warn!(client = %client, path = %path, "File not found");
            return ServeError::NotFound.into_response();
        }
    }

    // The validator already excluded unknown extensions; re-check before
    // anything is written.
    let extension = resolved
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    let Some(content_type) = mime::content_type(extension) else {
        tracing::warn!(client = %client, path = %path, "Extension slipped past validation");
        return ServeError::PathRejected(PathRejection::BadExtension).into_response();
    };

    let contents = match tokio::fs::read(&resolved).await {
        Ok(contents) => contents,
        Err(e) => {
            tracing::error!(client = %client, path = %path, error = %e, "File read failed");
            return ServeError::ReadFailure(e).into_response();
        }
    };

    if content_type == "text/html" {
        html_response(&contents)
    } else {
        asset_response(&request, contents, content_type, &state)
    }
}

/// HTML: fresh nonce injected into inline scripts, matching CSP header,
/// and no-cache headers so documents are always revalidated.
fn html_response(contents: &[u8]) -> Response {
    let (nonce, body) = csp::prepare_html(contents);

    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(response::HTML_CACHE_CONTROL),
    );
    // The policy is ASCII by construction (base64 nonce).
    if let Ok(policy) = HeaderValue::from_str(&csp::html_policy(&nonce)) {
        headers.insert(header::CONTENT_SECURITY_POLICY, policy);
    }
    response
}

/// Non-HTML: strong content-hash ETag with If-None-Match revalidation and
/// a tiered cache lifetime.
fn asset_response(
    request: &Request<Body>,
    contents: Vec<u8>,
    content_type: &'static str,
    state: &AppState,
) -> Response {
    let etag = response::compute_etag(&contents);
    let cache_control = response::cache_control(content_type, &state.config.cache);

    // If-None-Match may carry a comma-separated validator list, `*`, or
    // weak validators; hashing is content-based, so `W/` matches too.
    let revalidated = request
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value.split(',').map(str::trim).any(|candidate| {
                candidate == "*" || candidate.trim_start_matches("W/") == etag
            })
        });

    let mut response = if revalidated {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        Response::new(Body::from(contents))
    };

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    response
}
