//! Object key construction.
//!
//! The single source of truth for where an object lives inside the bucket.
//! Upload, bulk delete and URL issuance all resolve keys here; a divergence
//! would orphan objects or break issued URLs.

/// Strip leading and trailing path separators from a configured prefix.
#[must_use]
pub fn normalize_prefix(raw: &str) -> &str {
    raw.trim_matches('/')
}

/// Build the canonical object key for a stored filename.
///
/// A non-empty normalized prefix yields `"{prefix}/{filename}"`; an absent
/// or empty prefix leaves the filename untouched.
#[must_use]
pub fn build_key(path_prefix: Option<&str>, filename: &str) -> String {
    match path_prefix.map(normalize_prefix).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{prefix}/{filename}"),
        None => filename.to_string(),
    }
}
