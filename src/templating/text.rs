//! Small text helpers shared by the templating core.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics so "Declaração" and "declaracao" compare equal.
///
/// Decomposes to NFD first, so precomposed and combining-mark spellings of
/// the same text fold to the same ASCII letters.
pub fn fold_accents(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in fold_accents(name.trim()).chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty()
        {
            result.push('-');
            last_dash = true;
        }
    }

    let result = result.trim_matches('-');
    if result.is_empty() {
        return fallback.to_string();
    }

    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("Declaração de Residência"), "Declaracao de Residencia");
        assert_eq!(fold_accents("plain"), "plain");
    }

    #[test]
    fn test_fold_accents_decomposed_input() {
        let decomposed = "Declarac\u{0327}a\u{0303}o de Reside\u{0302}ncia";
        assert_eq!(fold_accents(decomposed), "Declaracao de Residencia");
        assert_eq!(sanitize_filename(decomposed, "documento"), "declaracao-de-residencia");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("João Mabunda", "documento"), "joao-mabunda");
        assert_eq!(sanitize_filename("  Spaces  ", "documento"), "spaces");
        assert_eq!(sanitize_filename("", "documento"), "documento");
        assert_eq!(sanitize_filename("!!!", "documento"), "documento");
        assert_eq!(sanitize_filename("Test--Name", "fb"), "test-name");
    }
}
