//! Sliding-window rate limiting.

use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::schema::RateLimitConfig;
use crate::http::response::ServeError;

/// Per-client sliding-window request limiter.
///
/// Each client IP maps to the timestamps of its requests within the
/// trailing window. The window is pruned on every admission check, and a
/// rejected attempt is never recorded.
pub struct RateLimiter {
    windows: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_limits(
            config.max_requests as usize,
            Duration::from_secs(config.window_secs),
            config.enabled,
        )
    }

    pub fn with_limits(max_requests: usize, window: Duration, enabled: bool) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
            enabled,
        }
    }

    /// Admit or reject a request from `client`.
    ///
    /// A first request from an unseen client always succeeds.
    pub fn admit(&self, client: IpAddr) -> bool {
        if !self.enabled {
            return true;
        }
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        let window = windows.entry(client).or_default();

        while window
            .front()
            .is_some_and(|first| now.duration_since(*first) >= self.window)
        {
            window.pop_front();
        }

        if window.len() >= self.max_requests {
            return false;
        }
        window.push_back(now);
        true
    }

    /// Drop clients whose most recent request is older than a full window.
    /// Runs from a periodic background task so idle clients do not
    /// accumulate forever.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        windows.retain(|_, window| {
            window
                .back()
                .is_some_and(|last| now.duration_since(*last) < self.window)
        });
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .expect("rate limiter mutex poisoned")
            .len()
    }
}

/// Middleware rejecting over-limit clients with 429 before any other work.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if limiter.admit(addr.ip()) {
        next.run(request).await
    } else {
        tracing::warn!(client = %addr.ip(), path = %request.uri().path(), "Rate limit exceeded");
        ServeError::RateLimitExceeded.into_response()
    }
}
