use client::LastFm;
use log::warn;

use crate::sources::TrackTagSource;

pub mod client;
pub mod models;

/// Tag names in service order.
#[async_trait::async_trait]
impl TrackTagSource for LastFm {
    async fn track_tags(&self, artist_name: &str, track_name: &str) -> Vec<String> {
        match self.get_track_info(artist_name, track_name).await {
            Ok(toptags) => toptags.tag.into_iter().map(|t| t.name).collect(),
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => {
                warn!("last.fm lookup failed for {} - {}: {}", artist_name, track_name, e);
                Vec::new()
            }
        }
    }
}

/// Tags shown in the popup's secondary list: anything with a digit in it
/// ("2010s", "seen live 2019") is a year or a personal note, not a genre.
pub fn secondary_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .filter(|name| !name.chars().any(|c| c.is_ascii_digit()))
        .collect()
}
