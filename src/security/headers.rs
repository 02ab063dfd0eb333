//! Security response headers and CORS.
//!
//! # Responsibilities
//! - Attach the fixed security headers to every response, including
//!   rejections produced by inner layers
//! - Add HSTS in production only
//! - Echo an allow-listed Origin into Access-Control-Allow-Origin;
//!   unknown origins get no CORS header at all (implicit deny)
//! - Fill in the static CSP for responses the dispatcher did not stamp
//!   with a nonce-bearing policy

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::schema::ServerConfig;
use crate::security::csp;

/// State for the header middleware, derived from config at startup.
#[derive(Clone)]
pub struct SecurityHeadersState {
    pub hsts_enabled: bool,
    pub allowed_origins: Arc<Vec<String>>,
}

impl SecurityHeadersState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            hsts_enabled: config.environment.is_production(),
            allowed_origins: Arc::new(config.allowed_origins().to_vec()),
        }
    }
}

pub async fn security_headers_middleware(
    State(state): State<SecurityHeadersState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-XSS-Protection", HeaderValue::from_static("1; mode=block"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "X-Permitted-Cross-Domain-Policies",
        HeaderValue::from_static("none"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(self), camera=(), microphone=(), payment=()"),
    );
    if state.hsts_enabled {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    // HTML responses carry a nonce-bearing policy set by the dispatcher;
    // everything else gets the static policy.
    if !headers.contains_key(header::CONTENT_SECURITY_POLICY) {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(csp::STATIC_POLICY),
        );
    }

    if let Some(origin) = origin {
        let allowed = origin
            .to_str()
            .is_ok_and(|o| state.allowed_origins.iter().any(|allowed| allowed == o));
        if allowed {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
    }

    response
}
