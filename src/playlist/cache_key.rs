/// Storage key for a genre: lowercased, with everything that is not a
/// letter or digit removed. Spelling variants of one genre ("Hip Hop",
/// "hip-hop", "HIPHOP") share a key.
pub fn cache_key(genre: &str) -> String {
    genre
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
