use std::collections::HashSet;

/// Drops repeated genres, comparing without regard to case. The first
/// spelling seen is the one kept, and first-seen order is preserved.
pub fn dedup_genres<I>(genres: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    genres
        .into_iter()
        .map(|genre| genre.trim().to_string())
        .filter(|genre| !genre.is_empty())
        .filter(|genre| seen.insert(genre.to_lowercase()))
        .collect()
}
