//! Durable identifiers derived from free-text names.

/// Identifier returned for empty input or input without a single `[a-z0-9]`.
pub const UNKNOWN_SLUG: &str = "unknown";

/// Lower-case `text`, collapse every run of characters outside `[a-z0-9]`
/// into one hyphen and trim hyphens from both ends.
///
/// The result is used as a file name and a cross-reference key, so it must
/// never change for the same input. It is never empty.
///
/// ```
/// use diecast_catalog::slug::slugify;
///
/// assert_eq!(slugify("'17 Audi RS 6 Avant"), "17-audi-rs-6-avant");
/// assert_eq!(slugify("  "), "unknown");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        UNKNOWN_SLUG.to_string()
    } else {
        slug
    }
}

/// Best-effort display name for an identifier: hyphens become spaces and
/// every word starts with a capital letter.
///
/// ```
/// use diecast_catalog::slug::humanize;
///
/// assert_eq!(humanize("hw-flames"), "Hw Flames");
/// ```
pub fn humanize(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
