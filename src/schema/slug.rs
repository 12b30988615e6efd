//! URL slugs for services and blog posts

/// Derive a slug from a title.
///
/// Lowercases, turns every run of non-alphanumeric characters into a single
/// hyphen and trims hyphens from both ends. Non-ASCII letters are
/// transliterated first, so `"Café"` becomes `"cafe"`.
pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}

/// Whether `candidate` is already in slug form (non-empty, `[a-z0-9-]`, no
/// leading/trailing or doubled hyphens)
pub fn is_valid_slug(candidate: &str) -> bool {
    !candidate.is_empty() && slugify(candidate) == candidate
}
