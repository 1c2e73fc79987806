//! Shared utility functions.

use std::path::{Path, PathBuf};

/// Derive a URL slug from a post identifier.
///
/// Export identifiers look like `<numeric id>.<slug>`; everything after the
/// first `.` is the slug. Identifiers without a `.` are used whole.
/// "123.my-post" -> "my-post"
/// "no-dot-id" -> "no-dot-id"
pub fn extract_slug(post_id: &str) -> &str {
    match post_id.split_once('.') {
        Some((_, slug)) => slug,
        None => post_id,
    }
}

/// Negate a "true"/"false" flag. Anything other than a case-insensitive
/// "true" counts as false, so it inverts to true.
pub fn invert_boolean(value: &str) -> bool {
    !value.eq_ignore_ascii_case("true")
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
