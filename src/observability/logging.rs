//! Structured logging.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber. RUST_LOG takes precedence over the
/// configured level.
pub fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("asset_server={default_level},tower_http=warn").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// One access-log line per request: client, method, path, user agent,
/// final status.
pub async fn access_log_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;

    tracing::info!(
        client = %addr.ip(),
        method = %method,
        path = %path,
        user_agent = %user_agent,
        status = response.status().as_u16(),
        "Request handled"
    );

    response
}
