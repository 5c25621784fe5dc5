/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Build a URL slug from a display name.
///
/// Lowercases ASCII letters and digits, collapses every other run of
/// characters into a single `-`, and trims dashes from both ends.
/// `"Meat Lover's Pizza (Large)"` becomes `"meat-lover-s-pizza-large"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Append a numeric suffix to a slug (`"pizza"`, 2 -> `"pizza-2"`)
pub fn slug_with_suffix(slug: &str, n: u32) -> String {
    if n <= 1 {
        slug.to_string()
    } else {
        format!("{slug}-{n}")
    }
}
