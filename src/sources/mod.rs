//! Seams between the genre pipeline and the services it talks to.
//!
//! Genre lookups return plain lists: an adapter that fails, or whose service
//! reports no match, answers with an empty list and logs the reason. Only
//! the playlist search surfaces its error, so the playlist resolver can
//! degrade a single genre's link.

use std::sync::Arc;

use crate::error::Result;

/// Genres keyed by a single artist id (Spotify artist metadata).
#[async_trait::async_trait]
pub trait ArtistGenreSource: Send + Sync {
    async fn artist_genres(&self, artist_id: &str) -> Vec<String>;
}

/// Tags keyed by `(artist name, track name)`.
#[async_trait::async_trait]
pub trait TrackTagSource: Send + Sync {
    async fn track_tags(&self, artist_name: &str, track_name: &str) -> Vec<String>;
}

/// The host's "related artists" relationship. `None` means the
/// relationship is unavailable for that artist.
#[async_trait::async_trait]
pub trait RelatedArtists: Send + Sync {
    async fn related_artist_uris(&self, artist_id: &str) -> Option<Vec<String>>;
}

/// One entry of a playlist search result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub uri: String,
    pub name: String,
    pub owner_id: String,
}

#[async_trait::async_trait]
pub trait PlaylistSearch: Send + Sync {
    async fn search_playlists(&self, query: &str, limit: u32) -> Result<Vec<PlaylistSummary>>;
}

/// The one genre source active in a deployment.
#[derive(Clone)]
pub enum PrimarySource {
    /// Looked up once per credited artist; eligible for related-artist
    /// fallback widening.
    Artist(Arc<dyn ArtistGenreSource>),
    /// Looked up once per track.
    Track(Arc<dyn TrackTagSource>),
}

impl std::fmt::Debug for PrimarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimarySource::Artist(_) => f.write_str("PrimarySource::Artist"),
            PrimarySource::Track(_) => f.write_str("PrimarySource::Track"),
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes;
