//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{Environment, ServerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file, or the built-in defaults when
/// `path` is `None`. Parsing only; environment overlay and validation are
/// separate steps so logging can be initialized in between.
pub fn load_file(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)
        }
        None => Ok(ServerConfig::default()),
    }
}

/// Apply the `PORT` and `APP_ENV` environment variables. Call after
/// logging is initialized so malformed values are visibly warned about.
pub fn apply_env_overrides(config: &mut ServerConfig) {
    let port = std::env::var("PORT").ok().and_then(|raw| match raw.parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!(value = %raw, "PORT is not a valid port number, ignoring");
            None
        }
    });
    let app_env = std::env::var("APP_ENV").ok();
    apply_overrides(config, port, app_env.as_deref());
}

/// Run semantic validation on a fully assembled configuration.
pub fn finalize(config: &ServerConfig) -> Result<(), ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}

/// Apply environment-derived overrides to a parsed configuration.
pub fn apply_overrides(config: &mut ServerConfig, port: Option<u16>, app_env: Option<&str>) {
    if let Some(port) = port {
        config.listener.set_port(port);
    }
    if let Some(env) = app_env {
        match env.to_ascii_lowercase().as_str() {
            "production" => config.environment = Environment::Production,
            "development" => config.environment = Environment::Development,
            other => {
                tracing::warn!(value = %other, "Unrecognized APP_ENV, keeping configured environment");
            }
        }
    }
}
