use log::{debug, warn};
use rspotify::{
    model::{ArtistId, SearchResult, SearchType},
    prelude::{BaseClient, Id},
    ClientCredsSpotify, Credentials,
};

use crate::{
    error::{Result, SourceError},
    sources::{ArtistGenreSource, PlaylistSearch, PlaylistSummary, RelatedArtists},
};

/// Spotify's catalog: artist genres, related artists and playlist search,
/// behind the client-credentials flow.
pub struct SpotifyCatalog {
    client: ClientCredsSpotify,
}

impl SpotifyCatalog {
    /// Builds the client without authenticating.
    pub fn new(client_id: &str, secret_token: &str) -> Self {
        let creds = Credentials::new(client_id, secret_token);
        Self {
            client: ClientCredsSpotify::new(creds),
        }
    }

    pub async fn connect(client_id: &str, secret_token: &str) -> Result<Self> {
        let catalog = Self::new(client_id, secret_token);
        catalog.client.request_token().await?;
        Ok(catalog)
    }

    fn artist_id(id: &str) -> Result<ArtistId<'_>> {
        ArtistId::from_id(id).map_err(|_| SourceError::InvalidId(id.to_string()))
    }

    pub async fn get_artist_genres(&self, artist_id: &str) -> Result<Vec<String>> {
        let artist = self.client.artist(Self::artist_id(artist_id)?).await?;
        Ok(artist.genres)
    }

    pub async fn get_related_artists(&self, artist_id: &str) -> Result<Vec<String>> {
        let related = self
            .client
            .artist_related_artists(Self::artist_id(artist_id)?)
            .await?;
        Ok(related.iter().map(|artist| artist.id.uri()).collect())
    }
}

#[async_trait::async_trait]
impl ArtistGenreSource for SpotifyCatalog {
    async fn artist_genres(&self, artist_id: &str) -> Vec<String> {
        match self.get_artist_genres(artist_id).await {
            Ok(genres) => genres,
            Err(e) => {
                warn!("artist genre lookup failed for {}: {}", artist_id, e);
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl RelatedArtists for SpotifyCatalog {
    async fn related_artist_uris(&self, artist_id: &str) -> Option<Vec<String>> {
        match self.get_related_artists(artist_id).await {
            Ok(uris) => Some(uris),
            Err(e) => {
                debug!("related artists unavailable for {}: {}", artist_id, e);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl PlaylistSearch for SpotifyCatalog {
    async fn search_playlists(&self, query: &str, limit: u32) -> Result<Vec<PlaylistSummary>> {
        let result = self
            .client
            .search(query, SearchType::Playlist, None, None, Some(limit), None)
            .await?;

        let playlists = match result {
            SearchResult::Playlists(page) => page
                .items
                .into_iter()
                .map(|playlist| PlaylistSummary {
                    uri: playlist.id.uri(),
                    name: playlist.name,
                    owner_id: playlist.owner.id.id().to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(playlists)
    }
}
