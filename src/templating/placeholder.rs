//! Placeholder extraction.
//!
//! A marker is `{{identifier}}` where the identifier is a non-empty run of
//! characters that are neither braces nor whitespace. Whitespace is allowed
//! just inside the braces (`{{ nome }}`).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Marker pattern shared by the extractor and the renderer.
    pub(crate) static ref MARKER_PATTERN: Regex =
        Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("marker pattern is a valid regex");
}

/// Return the placeholder identifiers of `template` in first-seen order,
/// each identifier appearing once.
///
/// Malformed markers (unbalanced or nested braces) are not matched and not
/// reported.
pub fn extract(template: &str) -> Vec<String> {
    let mut identifiers: Vec<String> = Vec::new();

    for captures in MARKER_PATTERN.captures_iter(template) {
        let identifier = &captures[1];
        if !identifiers.iter().any(|seen| seen == identifier) {
            identifiers.push(identifier.to_string());
        }
    }

    identifiers
}

/// Build the canonical marker for an identifier, e.g. `{{nome}}`.
pub fn placeholder_marker(identifier: &str) -> String {
    format!("{{{{{identifier}}}}}")
}

/// Build a template consisting only of the markers for `identifiers`,
/// separated by single spaces.
pub fn markers_template<S: AsRef<str>>(identifiers: &[S]) -> String {
    identifiers
        .iter()
        .map(|identifier| placeholder_marker(identifier.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
