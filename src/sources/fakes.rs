//! In-memory sources for unit tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use super::{
    ArtistGenreSource, PlaylistSearch, PlaylistSummary, RelatedArtists, TrackTagSource,
};
use crate::error::{Result, SourceError};

#[derive(Default)]
pub struct FakeArtists {
    pub genres: HashMap<String, Vec<String>>,
    pub related: HashMap<String, Vec<String>>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeArtists {
    pub fn with_genres(mut self, artist_id: &str, genres: &[&str]) -> Self {
        self.genres.insert(
            artist_id.to_string(),
            genres.iter().map(|g| g.to_string()).collect(),
        );
        self
    }

    pub fn with_related(mut self, artist_id: &str, related_ids: &[&str]) -> Self {
        self.related.insert(
            artist_id.to_string(),
            related_ids
                .iter()
                .map(|id| format!("spotify:artist:{}", id))
                .collect(),
        );
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ArtistGenreSource for FakeArtists {
    async fn artist_genres(&self, artist_id: &str) -> Vec<String> {
        self.lookups.lock().unwrap().push(artist_id.to_string());
        self.genres.get(artist_id).cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RelatedArtists for FakeArtists {
    async fn related_artist_uris(&self, artist_id: &str) -> Option<Vec<String>> {
        self.related.get(artist_id).cloned()
    }
}

#[derive(Default)]
pub struct FakeTags {
    pub tags: HashMap<(String, String), Vec<String>>,
}

impl FakeTags {
    pub fn with_tags(mut self, artist: &str, track: &str, tags: &[&str]) -> Self {
        self.tags.insert(
            (artist.to_string(), track.to_string()),
            tags.iter().map(|t| t.to_string()).collect(),
        );
        self
    }
}

#[async_trait::async_trait]
impl TrackTagSource for FakeTags {
    async fn track_tags(&self, artist_name: &str, track_name: &str) -> Vec<String> {
        self.tags
            .get(&(artist_name.to_string(), track_name.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

/// Playlist search keyed by the exact query string. Queries listed in
/// `failing` answer with a transport-style error.
#[derive(Default)]
pub struct FakeSearch {
    pub results: HashMap<String, Vec<PlaylistSummary>>,
    pub failing: Vec<String>,
    pub calls: AtomicUsize,
}

impl FakeSearch {
    pub fn with_result(mut self, query: &str, uri: &str, name: &str, owner: &str) -> Self {
        self.results
            .entry(query.to_string())
            .or_default()
            .push(PlaylistSummary {
                uri: uri.to_string(),
                name: name.to_string(),
                owner_id: owner.to_string(),
            });
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PlaylistSearch for FakeSearch {
    async fn search_playlists(&self, query: &str, limit: u32) -> Result<Vec<PlaylistSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|q| q == query) {
            return Err(SourceError::not_found("fake", query));
        }
        Ok(self
            .results
            .get(query)
            .map(|items| items.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }
}
