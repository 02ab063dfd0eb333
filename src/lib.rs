//! Hardened Static Asset Server Library

pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
