use std::collections::HashSet;

/// Builds a unique anchor slug for a section or page heading.
///
/// - ASCII letters are lowercased, digits kept.
/// - Other alphanumerics are kept, Unicode-lowercased (`Café` → `café`).
/// - Whitespace, `-`, `_`, `.`, `/` collapse into single hyphens.
/// - Everything else (punctuation, symbols, `&`) is dropped.
/// - Leading and trailing hyphens are trimmed; an empty result becomes
///   `section`.
///
/// Slugs already present in `used_slugs` get `-1`, `-2`, … suffixes until
/// unique, and the returned slug is recorded. Checking every candidate, not
/// just the base, keeps a natural `skills-1` from colliding with a suffixed
/// duplicate.
///
/// Inspired by GitHub's slugger:
/// <https://github.com/markdown-it-rust/markdown-it-plugins.rs/blob/main/crates/github_slugger/src/lib.rs>
pub fn slugify(text: &str, used_slugs: &mut HashSet<String>) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_hyphen = false;
            continue;
        }

        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_hyphen = false;
            continue;
        }

        if (ch.is_whitespace() || matches!(ch, '-' | '_' | '.' | '/'))
            && !slug.is_empty()
            && !last_hyphen
        {
            slug.push('-');
            last_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        slug.push_str("section");
    }

    let base = slug.clone();
    let mut candidate = slug;
    let mut n = 1;

    while used_slugs.contains(&candidate) {
        candidate = format!("{base}-{n}");
        n += 1;
    }

    used_slugs.insert(candidate.clone());
    candidate
}
