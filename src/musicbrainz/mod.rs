use client::MusicBrainz;
use log::warn;

use crate::sources::TrackTagSource;

pub mod client;
pub mod models;

#[async_trait::async_trait]
impl TrackTagSource for MusicBrainz {
    async fn track_tags(&self, artist_name: &str, track_name: &str) -> Vec<String> {
        match self.recording_tags(artist_name, track_name).await {
            Ok(tags) => tags,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => {
                warn!("musicbrainz lookup failed for {} - {}: {}", artist_name, track_name, e);
                Vec::new()
            }
        }
    }
}
