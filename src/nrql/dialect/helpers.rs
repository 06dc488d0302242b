//! Shared helper functions for dialect implementations.

/// Prefix carried by entity tag attributes (`tags.Environment`, `tags.team`).
pub const TAG_PREFIX: &str = "tags.";

pub fn is_tag_attribute(attribute: &str) -> bool {
    attribute.starts_with(TAG_PREFIX)
}

/// Whether NRQL accepts the attribute name without backticks.
pub fn is_bare_attribute(attribute: &str) -> bool {
    !attribute.is_empty()
        && attribute
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Quote attribute with backticks only when it contains characters
/// outside `[A-Za-z0-9_.]`.
pub fn quote_backtick_if_needed(attribute: &str) -> String {
    if is_bare_attribute(attribute) {
        attribute.to_string()
    } else {
        format!("`{}`", attribute.replace('`', "\\`"))
    }
}

/// Quote string with single quotes, backslash-escaping embedded quotes.
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
