//! Resolve asset references against the page URL.

use url::Url;

/// Resolve `reference` against `base` into an absolute http(s) URL.
///
/// Handles absolute, protocol-relative and path-relative references with
/// standard URL joining. Returns `None` for empty or unparsable input and
/// for anything that does not end up on an http(s) scheme.
pub fn resolve(base: &str, reference: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    resolve_against(&base, reference)
}

/// Same as [`resolve`] with an already parsed base.
pub fn resolve_against(base: &Url, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    let joined = base.join(reference).ok()?;
    match joined.scheme() {
        "http" | "https" => Some(joined.to_string()),
        _ => None,
    }
}
