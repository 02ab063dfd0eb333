//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the static asset server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Deployment environment (selects HSTS and the CORS origin set).
    pub environment: Environment,

    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// Site layout: document root, index file, allow-list.
    pub site: SiteConfig,

    /// Per-client rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// CORS origin allow-lists per environment.
    pub cors: CorsConfig,

    /// Cache lifetimes for non-HTML assets.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// The CORS origin allow-list for the active environment.
    pub fn allowed_origins(&self) -> &[String] {
        match self.environment {
            Environment::Production => &self.cors.production_origins,
            Environment::Development => &self.cors.development_origins,
        }
    }
}

/// Deployment environment.
///
/// Production enables HSTS and switches to the production CORS allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000"). The PORT environment
    /// variable replaces the port portion.
    pub bind_address: String,

    /// Request timeout in seconds (whole request/response cycle).
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl ListenerConfig {
    /// Replace the port portion of the bind address, keeping the host.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        self.bind_address = format!("{host}:{port}");
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Site layout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory the server is allowed to serve from.
    pub document_root: PathBuf,

    /// File served for requests to `/`.
    pub index_file: String,

    /// Base file names (not paths) servable from the document root.
    pub allowed_files: Vec<String>,

    /// Relative directory prefixes under which any known-extension file
    /// may be served (must end with '/').
    pub asset_prefixes: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("public"),
            index_file: "index.html".to_string(),
            allowed_files: vec![
                "index.html".to_string(),
                "offline.html".to_string(),
                "404.html".to_string(),
                "manifest.webmanifest".to_string(),
                "emergency-service-worker.js".to_string(),
                "favicon.ico".to_string(),
                "robots.txt".to_string(),
                "sitemap.xml".to_string(),
            ],
            asset_prefixes: vec![
                "assets/".to_string(),
                "images/".to_string(),
                "icons/".to_string(),
            ],
        }
    }
}

/// Rate limiting configuration (sliding window, per client IP).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per client within the window.
    pub max_requests: u32,

    /// Window duration in seconds.
    pub window_secs: u64,

    /// Interval of the background sweep that drops idle clients.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 60,
            sweep_interval_secs: 300,
        }
    }
}

/// CORS origin allow-lists.
///
/// The `Origin` header is echoed into `Access-Control-Allow-Origin` only
/// when it appears in the active environment's list; otherwise the header
/// is omitted entirely.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed in production.
    pub production_origins: Vec<String>,

    /// Origins allowed in development.
    pub development_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            production_origins: Vec::new(),
            development_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

/// Cache lifetimes for non-HTML responses. HTML is always `no-store`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Max-age for scripts and stylesheets in seconds.
    pub script_style_max_age_secs: u64,

    /// Max-age for all other static assets in seconds.
    pub asset_max_age_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            script_style_max_age_secs: 3600,
            asset_max_age_secs: 86400,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_port_keeps_host() {
        let mut listener = ListenerConfig::default();
        listener.set_port(8080);
        assert_eq!(listener.bind_address, "127.0.0.1:8080");

        let mut listener = ListenerConfig {
            bind_address: "0.0.0.0:3000".to_string(),
            ..Default::default()
        };
        listener.set_port(9000);
        assert_eq!(listener.bind_address, "0.0.0.0:9000");
    }

    #[test]
    fn test_allowed_origins_follow_environment() {
        let mut config = ServerConfig::default();
        config.cors.production_origins = vec!["https://example.com".to_string()];

        assert!(config
            .allowed_origins()
            .contains(&"http://localhost:3000".to_string()));

        config.environment = Environment::Production;
        assert_eq!(config.allowed_origins(), ["https://example.com"]);
    }

    #[test]
    fn test_environment_deserializes_lowercase() {
        let config: ServerConfig = toml::from_str("environment = \"production\"").unwrap();
        assert!(config.environment.is_production());
    }
}
