//! Title canonicalization for cross-site matching.

/// Canonicalizes a free-text product title into a comparison key.
///
/// Lowercases, then drops every character that is not an ASCII letter or
/// digit. Whitespace and punctuation disappear entirely, so
/// `"Nike Air-Max 90!"` and `"nike air max 90"` both become `"nikeairmax90"`.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
