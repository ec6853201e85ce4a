/// Derive a URL-safe slug from a post title.
///
/// ASCII letters and digits are kept (lowercased); every run of other
/// characters becomes a single `-`. Hyphens at either end are dropped, so
/// `slugify(slugify(t)) == slugify(t)`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
