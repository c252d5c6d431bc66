use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};
use serde_derive::Serialize;

use crate::{sources::PlaylistSearch, store::Store};

pub mod cache_key;
pub mod matcher;

pub use cache_key::cache_key;
pub use matcher::{is_curated_match, CURATED_OWNER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "uri", rename_all = "lowercase")]
pub enum PlaylistMatch {
    /// The curated "The Sound of <genre>" playlist.
    Found(String),
    /// Top search hit, not verified as the curated playlist.
    Ambiguous(String),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistResolution {
    pub genre: String,
    pub playlist: PlaylistMatch,
}

impl PlaylistResolution {
    pub fn uri(&self) -> Option<&str> {
        match &self.playlist {
            PlaylistMatch::Found(uri) | PlaylistMatch::Ambiguous(uri) => Some(uri),
            PlaylistMatch::NotFound => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self.playlist, PlaylistMatch::Ambiguous(_))
    }
}

/// Finds the curated playlist for a genre, going through the persisted
/// cache first. This is the only place cache entries are created.
pub struct PlaylistResolver {
    search: Arc<dyn PlaylistSearch>,
    store: Arc<Store>,
}

impl PlaylistResolver {
    pub fn new(search: Arc<dyn PlaylistSearch>, store: Arc<Store>) -> Self {
        Self { search, store }
    }

    pub async fn resolve(&self, genre: &str) -> PlaylistResolution {
        let key = cache_key(genre);
        if let Some(uri) = self.store.get_cached(&key) {
            return PlaylistResolution {
                genre: genre.to_string(),
                playlist: PlaylistMatch::Found(uri),
            };
        }

        let query = format!("The Sound of {}", genre);
        let results = match self.search.search_playlists(&query, 1).await {
            Ok(results) => results,
            Err(e) => {
                warn!("playlist search failed for {:?}: {}", genre, e);
                Vec::new()
            }
        };

        // only the top hit is ever inspected
        let playlist = match results.into_iter().next() {
            None => PlaylistMatch::NotFound,
            Some(top) if is_curated_match(&top, genre) => {
                if key.is_empty() {
                    debug!("not caching {:?}: empty cache key", genre);
                } else {
                    self.store.put_cached(&key, &top.uri);
                }
                PlaylistMatch::Found(top.uri)
            }
            Some(top) => PlaylistMatch::Ambiguous(top.uri),
        };

        PlaylistResolution {
            genre: genre.to_string(),
            playlist,
        }
    }

    /// Resolves every genre concurrently; results keep the input order.
    pub async fn resolve_all(&self, genres: &[String]) -> Vec<PlaylistResolution> {
        join_all(genres.iter().map(|genre| self.resolve(genre))).await
    }
}
