//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the allow-list and asset prefixes are well-formed
//! - Validate value ranges (window > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn error(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a configuration, collecting every semantic error.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(error(
            "listener.bind_address",
            format!("'{}' is not a valid socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(error("listener.request_timeout_secs", "must be greater than zero"));
    }

    if config.site.index_file.is_empty() || config.site.index_file.contains('/') {
        errors.push(error(
            "site.index_file",
            "must be a bare file name, not a path",
        ));
    }
    for name in &config.site.allowed_files {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            errors.push(error(
                "site.allowed_files",
                format!("'{}' must be a bare file name, not a path", name),
            ));
        }
    }
    for prefix in &config.site.asset_prefixes {
        if prefix.is_empty() || prefix.starts_with('/') || !prefix.ends_with('/') {
            errors.push(error(
                "site.asset_prefixes",
                format!("'{}' must be a relative directory prefix ending in '/'", prefix),
            ));
        }
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(error("rate_limit.max_requests", "must be greater than zero"));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(error("rate_limit.window_secs", "must be greater than zero"));
        }
        if config.rate_limit.sweep_interval_secs == 0 {
            errors.push(error("rate_limit.sweep_interval_secs", "must be greater than zero"));
        }
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(error(
            "observability.log_level",
            format!("'{}' is not one of {:?}", config.observability.log_level, LOG_LEVELS),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
