//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!
//! Consumers:
//!     → stdout (process-local stream, one line per request,
//!       one WARN/ERROR line per rejection with the internal reason)
//! ```
//!
//! # Design Decisions
//! - Structured fields, not string interpolation
//! - Rejection sub-reasons never leave the logs; clients get generic bodies
//! - Log level configurable via config and RUST_LOG

pub mod logging;
