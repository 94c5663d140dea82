//! Validation utilities for package paths.

use aotgen_core::is_rust_keyword;
use miette::SourceSpan;

/// Validate that a single segment is a valid Rust identifier.
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    if is_rust_keyword(name) {
        return Some("segment is a Rust reserved keyword");
    }

    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("segment must start with a letter or underscore"),
        None => return Some("segment cannot be empty"),
    }

    if name == "_" {
        return Some("segment cannot be a lone underscore");
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Some("segment must contain only letters, numbers, and underscores");
    }

    None
}

/// Validate a `::`-separated package path.
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_package(package: &str) -> Option<&'static str> {
    if package.trim().is_empty() {
        return Some("package cannot be empty");
    }
    package.split("::").find_map(validate_identifier)
}

/// Find the span of a quoted string value in the TOML source
pub(crate) fn find_value_span(src: &str, value: &str) -> Option<SourceSpan> {
    for quote in ['"', '\''] {
        let pattern = format!("{quote}{value}{quote}");
        if let Some(pos) = src.find(&pattern) {
            // +1 to skip the opening quote
            return Some(SourceSpan::from((pos + 1, value.len())));
        }
    }
    None
}

/// Find the span of an option key in the TOML source
pub(crate) fn find_key_span(src: &str, key: &str) -> Option<SourceSpan> {
    find_value_span(src, key).or_else(|| {
        src.find(&format!("{} =", key))
            .or_else(|| src.find(&format!("{}=", key)))
            .map(|pos| SourceSpan::from((pos, key.len())))
    })
}
