//! Name canonicalization shared by metric registration and rule rendering.
//!
//! Prometheus identifiers are restricted to `[a-zA-Z_:][a-zA-Z0-9_:]*`;
//! [`normalize`] maps free-form names onto the lowercase `[a-z0-9_]` subset.

/// Lowercase `raw` and collapse every run of non-alphanumeric characters into
/// a single `_`, dropping a leading or trailing separator.
///
/// Only ASCII letters and digits survive; everything else is a separator.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Join `prefix` and `name` into a fully-qualified metric name.
///
/// The prefix segment (and its separator) is omitted when the normalized
/// prefix is empty.
pub fn qualify(prefix: &str, name: &str) -> String {
    let prefix = normalize(prefix);
    let name = normalize(name);
    if prefix.is_empty() {
        name
    } else {
        format!("{prefix}_{name}")
    }
}

/// Split on runs of `-`, `_` or `.`, uppercase the first character of each
/// word, and concatenate. The rest of each word is left as-is.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split(['-', '_', '.']).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
