//! Content resolution subsystem.
//!
//! # Data Flow
//! ```text
//! raw URL path
//!     → path.rs (strip, normalize, allow-list, root-escape check)
//!     → absolute file path under the document root
//!     → mime.rs (extension → content type)
//!     → dispatcher reads the file and writes the response
//! ```
//!
//! # Design Decisions
//! - Path validation is purely lexical; it never touches the filesystem
//! - Unknown extensions are never served, even for allow-listed names
//! - Existence is the dispatcher's concern (missing file → 404)

pub mod mime;
pub mod path;

pub use path::{PathRejection, PathValidator};
