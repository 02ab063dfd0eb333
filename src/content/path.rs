//! Request path validation.
//!
//! # Responsibilities
//! - Map `/` to the configured index file
//! - Lexically normalize `.` / `..` segments (no filesystem access)
//! - Reject traversal shapes: `..`, backslashes, doubled separators,
//!   leading dots
//! - Enforce the allow-list / asset-prefix membership rule
//! - Reject extensions absent from the MIME table
//! - Final defense in depth: the joined absolute path must stay under the
//!   document root

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::content::mime;

/// Why a requested path was refused. Logged server-side only; clients see
/// a generic 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathRejection {
    #[error("path traversal attempt")]
    Traversal,
    #[error("file name not allow-listed")]
    Unauthorized,
    #[error("extension not servable")]
    BadExtension,
    #[error("resolved path escapes document root")]
    Escape,
}

/// Validates raw URL paths against the site layout.
pub struct PathValidator {
    root: PathBuf,
    index_file: String,
    allowed_files: HashSet<String>,
    asset_prefixes: Vec<String>,
}

impl PathValidator {
    /// Build a validator for the given site. Fails if the document root
    /// does not exist (it is canonicalized once here so the final escape
    /// check compares against a stable absolute path).
    pub fn new(site: &SiteConfig) -> std::io::Result<Self> {
        let root = site.document_root.canonicalize()?;
        Ok(Self {
            root,
            index_file: site.index_file.clone(),
            allowed_files: site.allowed_files.iter().cloned().collect(),
            asset_prefixes: site.asset_prefixes.clone(),
        })
    }

    /// The canonical document root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a raw URL path and resolve it to an absolute file path.
    /// Never checks existence; a missing file is the dispatcher's 404.
    pub fn validate(&self, raw_path: &str) -> Result<PathBuf, PathRejection> {
        // Strip exactly one leading separator; a doubled one must survive
        // into the checks below.
        let trimmed = raw_path.strip_prefix('/').unwrap_or(raw_path);
        let requested = if trimmed.is_empty() {
            self.index_file.as_str()
        } else {
            trimmed
        };

        // Shapes that normalization would erase are rejected up front.
        if requested.contains('\\') || requested.contains("//") || requested.starts_with('/') {
            return Err(PathRejection::Traversal);
        }

        let normalized = normalize(requested);
        if normalized.is_empty() || normalized.starts_with('.') {
            return Err(PathRejection::Traversal);
        }
        if normalized.split('/').any(|segment| segment == "..") {
            return Err(PathRejection::Traversal);
        }

        let base_name = normalized.rsplit('/').next().unwrap_or(normalized.as_str());
        let allowed = self.allowed_files.contains(base_name)
            || self
                .asset_prefixes
                .iter()
                .any(|prefix| normalized.starts_with(prefix.as_str()));
        if !allowed {
            return Err(PathRejection::Unauthorized);
        }

        let extension = Path::new(base_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or(PathRejection::BadExtension)?;
        if mime::content_type(extension).is_none() {
            return Err(PathRejection::BadExtension);
        }

        let absolute = self.root.join(&normalized);
        if !absolute.starts_with(&self.root) {
            return Err(PathRejection::Escape);
        }

        Ok(absolute)
    }
}

/// Lexically normalize a relative path: drop `.` segments, collapse
/// `segment/..` pairs. Un-collapsible `..` segments are kept so the caller
/// can reject them.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&"..") | None => segments.push(".."),
                Some(_) => {
                    segments.pop();
                }
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SiteConfig;

    fn validator() -> (tempfile::TempDir, PathValidator) {
        let dir = tempfile::tempdir().unwrap();
        let site = SiteConfig {
            document_root: dir.path().to_path_buf(),
            ..Default::default()
        };
        let validator = PathValidator::new(&site).unwrap();
        (dir, validator)
    }

    #[test]
    fn test_root_maps_to_index() {
        let (_dir, v) = validator();
        let resolved = v.validate("/").unwrap();
        assert_eq!(resolved, v.root().join("index.html"));
    }

    #[test]
    fn test_traversal_shapes_rejected() {
        let (_dir, v) = validator();
        assert_eq!(v.validate("/../../etc/passwd"), Err(PathRejection::Traversal));
        assert_eq!(v.validate("/..\\windows"), Err(PathRejection::Traversal));
        assert_eq!(v.validate("/assets//app.js"), Err(PathRejection::Traversal));
        assert_eq!(v.validate("/.env"), Err(PathRejection::Traversal));
        assert_eq!(v.validate("/.."), Err(PathRejection::Traversal));
    }

    #[test]
    fn test_leading_doubled_separator_rejected() {
        let (_dir, v) = validator();
        assert_eq!(v.validate("//index.html"), Err(PathRejection::Traversal));
        assert_eq!(v.validate("///index.html"), Err(PathRejection::Traversal));
        assert_eq!(v.validate("//"), Err(PathRejection::Traversal));
        // The bare root still maps to the index file.
        assert!(v.validate("/").is_ok());
    }

    #[test]
    fn test_internal_dot_segments_collapse() {
        let (_dir, v) = validator();
        // "assets/x/../app.js" normalizes to a servable path.
        let resolved = v.validate("/assets/x/../app.js").unwrap();
        assert_eq!(resolved, v.root().join("assets/app.js"));
        // "./index.html" collapses to the allow-listed index.
        let resolved = v.validate("/./index.html").unwrap();
        assert_eq!(resolved, v.root().join("index.html"));
    }

    #[test]
    fn test_allow_list_membership() {
        let (_dir, v) = validator();
        assert!(v.validate("/emergency-service-worker.js").is_ok());
        assert_eq!(
            v.validate("/server-config.js"),
            Err(PathRejection::Unauthorized)
        );
        // Asset prefixes admit any known-extension file.
        assert!(v.validate("/assets/site.css").is_ok());
        assert!(v.validate("/images/van.webp").is_ok());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let (_dir, v) = validator();
        assert_eq!(
            v.validate("/assets/data.conf"),
            Err(PathRejection::BadExtension)
        );
        // Allow-listed names still need a known extension.
        assert_eq!(v.validate("/assets/README"), Err(PathRejection::BadExtension));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a/b/c"), "a/b/c");
        assert_eq!(normalize("a/./b"), "a/b");
        assert_eq!(normalize("a/../b"), "b");
        assert_eq!(normalize("../a"), "../a");
        assert_eq!(normalize("a/../../b"), "../b");
    }
}
