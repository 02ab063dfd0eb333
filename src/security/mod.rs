//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (fixed security headers, HSTS, CORS origin echo)
//!     → rate_limit.rs (sliding-window per-IP admission)
//!     → dispatcher (path validation happens in content/)
//!
//! Outgoing HTML:
//!     → csp.rs (fresh nonce, CSP header value, inline <script> rewrite)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod csp;
pub mod headers;
pub mod rate_limit;

pub use rate_limit::RateLimiter;
