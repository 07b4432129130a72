//! `LIKE`/`ILIKE` pattern building.

/// Pattern matching any value that contains `fragment` literally.
///
/// PostgreSQL's default escape character is the backslash, so wildcard and
/// escape characters in `fragment` are prefixed with one.
pub(crate) fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
