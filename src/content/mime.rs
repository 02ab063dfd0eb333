//! Extension → content-type resolution.
//!
//! Pure lookup over a fixed table. Absence is meaningful: extensions not
//! listed here are never served (the path validator rejects them, and the
//! dispatcher re-checks before writing a response).

/// Resolve a file extension (without the dot) to a content type.
/// Case-insensitive; returns `None` for unknown extensions.
pub fn content_type(extension: &str) -> Option<&'static str> {
    let ext = extension.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        "html" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "webmanifest" => "application/manifest+json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(content_type)
}
