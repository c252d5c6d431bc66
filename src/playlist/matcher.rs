use regex::RegexBuilder;

use crate::sources::PlaylistSummary;

/// Account that publishes the "The Sound of <genre>" playlists.
pub const CURATED_OWNER: &str = "thesoundsofspotify";

/// Owned by the curated account and titled exactly "The Sound of <genre>",
/// ignoring case.
pub fn is_curated_match(playlist: &PlaylistSummary, genre: &str) -> bool {
    if playlist.owner_id != CURATED_OWNER {
        return false;
    }
    let pattern = format!("^the sound of {}$", regex::escape(genre));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(&playlist.name),
        Err(_) => false,
    }
}
