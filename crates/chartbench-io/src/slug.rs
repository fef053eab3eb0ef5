/// Lowercase `title` and collapse each run of whitespace into one hyphen.
///
/// Leading and trailing whitespace also become hyphens; nothing else is
/// stripped or transliterated.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
                in_space = true;
            }
        } else {
            in_space = false;
            slug.extend(c.to_lowercase());
        }
    }
    slug
}
