//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults otherwise)
//!     → environment overlay (PORT, APP_ENV)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults so the server runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - Environment variables override the file, CLI flags override both

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::Environment;
pub use schema::ServerConfig;
