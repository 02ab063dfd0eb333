//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the asset handler
//! - Wire up middleware (trace, timeout, body limit, access log,
//!   security headers, rate limit)
//! - Serve with graceful shutdown (in-flight responses drain)
//! - Spawn the rate-limiter sweep task

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::any, Router};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::schema::ServerConfig;
use crate::content::PathValidator;
use crate::http::handler::serve_asset;
use crate::lifecycle::Shutdown;
use crate::observability::logging::access_log_middleware;
use crate::security::headers::{security_headers_middleware, SecurityHeadersState};
use crate::security::rate_limit::rate_limit_middleware;
use crate::security::RateLimiter;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub paths: Arc<PathValidator>,
}

/// HTTP server for static assets.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new server. Fails when the document root does not exist.
    pub fn new(config: ServerConfig) -> std::io::Result<Self> {
        let paths = Arc::new(PathValidator::new(&config.site)?);
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        let state = AppState {
            config: Arc::new(config.clone()),
            paths,
        };
        let router = Self::build_router(&config, state, limiter.clone());

        Ok(Self {
            router,
            config,
            limiter,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order (outermost first): trace → body limit → timeout →
    /// access log → security headers → rate limit → handler, so every
    /// response including a 429 carries the security headers and is
    /// logged.
    fn build_router(
        config: &ServerConfig,
        state: AppState,
        limiter: Arc<RateLimiter>,
    ) -> Router {
        let headers_state = SecurityHeadersState::from_config(config);

        Router::new()
            .route("/", any(serve_asset))
            .route("/{*path}", any(serve_asset))
            .with_state(state)
            .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
            .layer(middleware::from_fn_with_state(
                headers_state,
                security_headers_middleware,
            ))
            .layer(middleware::from_fn(access_log_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown coordinator fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = ?self.config.environment,
            "HTTP server starting"
        );

        if self.config.rate_limit.enabled {
            let limiter = self.limiter.clone();
            let interval = Duration::from_secs(self.config.rate_limit.sweep_interval_secs);
            let mut sweep_shutdown = shutdown.subscribe();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await; // first tick completes immediately
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            limiter.sweep();
                            tracing::debug!(
                                tracked_clients = limiter.tracked_clients(),
                                "Rate limiter sweep complete"
                            );
                        }
                        _ = sweep_shutdown.recv() => break,
                    }
                }
            });
        }

        let mut serve_shutdown = shutdown.subscribe();
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = serve_shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
