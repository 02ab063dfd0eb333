//! Content-Security-Policy nonces for HTML responses.
//!
//! # Responsibilities
//! - Generate a fresh 128-bit random nonce per HTML response
//! - Build the nonce-bearing CSP header value
//! - Rewrite inline `<script>` tags to carry the nonce
//!
//! # Design Decisions
//! - The rewrite is byte-oriented and per-response only; source files are
//!   never modified or cached in rewritten form
//! - Scripts with a `src` attribute are left untouched (external sources
//!   are covered by `'self'`, not the nonce)
//! - A tag is only rewritten when its attribute region is well-formed
//!   (terminated by `>`); truncated tags pass through unchanged

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

/// CSP applied to non-HTML responses (no inline scripts to whitelist).
pub const STATIC_POLICY: &str = "default-src 'self'; script-src 'self'; \
    style-src 'self' 'unsafe-inline'; img-src 'self' data:; \
    font-src 'self' data:; object-src 'none'; base-uri 'self'; \
    frame-ancestors 'none'";

/// Generate a single-use base64 nonce with 128 bits of entropy.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// Build the CSP header value for an HTML response carrying `nonce`.
pub fn html_policy(nonce: &str) -> String {
    format!(
        "default-src 'self'; script-src 'self' 'nonce-{nonce}'; \
         style-src 'self' 'unsafe-inline'; img-src 'self' data:; \
         font-src 'self' data:; object-src 'none'; base-uri 'self'; \
         frame-ancestors 'none'"
    )
}

/// Prepare an HTML body: returns the fresh nonce (for the header) and the
/// rewritten bytes (for the body) so the caller emits a consistent pair.
pub fn prepare_html(body: &[u8]) -> (String, Vec<u8>) {
    let nonce = generate_nonce();
    let rewritten = inject_nonce(body, &nonce);
    (nonce, rewritten)
}

/// Insert `nonce="…"` into every opening `<script` tag that has no `src`
/// attribute.
fn inject_nonce(body: &[u8], nonce: &str) -> Vec<u8> {
    const TAG: &[u8] = b"<script";
    let attribute = format!(" nonce=\"{nonce}\"");

    let mut out = Vec::with_capacity(body.len() + 2 * attribute.len());
    let mut i = 0;
    while i < body.len() {
        if script_tag_at(body, i) {
            let name_end = i + TAG.len();
            if let Some(gt) = body[name_end..].iter().position(|&b| b == b'>') {
                let gt = name_end + gt;
                out.extend_from_slice(TAG);
                if !has_src_attribute(&body[name_end..gt]) {
                    out.extend_from_slice(attribute.as_bytes());
                }
                out.extend_from_slice(&body[name_end..=gt]);
                i = gt + 1;
                continue;
            }
        }
        out.push(body[i]);
        i += 1;
    }
    out
}

/// True when `body[i..]` opens a `<script` tag (case-insensitive, followed
/// by whitespace, `>` or `/`).
fn script_tag_at(body: &[u8], i: usize) -> bool {
    const TAG: &[u8] = b"<script";
    if body.len() < i + TAG.len() || !body[i..i + TAG.len()].eq_ignore_ascii_case(TAG) {
        return false;
    }
    match body.get(i + TAG.len()) {
        Some(&next) => next.is_ascii_whitespace() || next == b'>' || next == b'/',
        None => false,
    }
}

/// True when the attribute region contains a `src` attribute.
fn has_src_attribute(region: &[u8]) -> bool {
    for j in 0..region.len().saturating_sub(2) {
        if !region[j..j + 3].eq_ignore_ascii_case(b"src") {
            continue;
        }
        let boundary_before = j == 0 || region[j - 1].is_ascii_whitespace();
        if !boundary_before {
            continue;
        }
        let mut k = j + 3;
        while k < region.len() && region[k].is_ascii_whitespace() {
            k += 1;
        }
        if region.get(k) == Some(&b'=') {
            return true;
        }
    }
    false
}
