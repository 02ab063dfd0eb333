//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack, graceful shutdown)
//!     → security middleware (headers, rate limit)
//!     → handler.rs (method gate, path validation, file read)
//!     → response.rs (status mapping, cache headers, ETag)
//!     → Send to client
//! ```

pub mod handler;
pub mod response;
pub mod server;

pub use response::ServeError;
pub use server::HttpServer;
