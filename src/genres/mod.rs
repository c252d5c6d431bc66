//! Genre resolution: given a track (or an artist page), work out which
//! genres to show and which playlist each one links to.
//!
//! A cycle runs through these steps:
//!
//! 1. look up the primary source, once per credited artist (artist-keyed
//!    sources) or once per track (tag sources), tolerating failures;
//! 2. when that yields nothing, widen over the first artist's related
//!    artists in batches of [`FALLBACK_BATCH`], up to [`FALLBACK_LIMIT`],
//!    stopping at the first batch with any genre;
//! 3. de-duplicate without regard to case;
//! 4. resolve a playlist for every genre that will be displayed.
//!
//! Nothing is retried and nothing is reported as an error: the worst
//! outcome is an empty genre list. Each surface has its own
//! [`GenerationCounter`], so a slow cycle for a track that is no longer
//! playing is dropped instead of overwriting a newer one.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture, FutureExt};
use log::{debug, info};
use serde_derive::Serialize;

use crate::{
    lastfm::secondary_tags,
    playlist::{PlaylistResolution, PlaylistResolver},
    sources::{PrimarySource, RelatedArtists, TrackTagSource},
    store::Store,
    track::{artist_id_from_uri, Track, UriType},
};

pub mod dedup;
pub mod generation;

pub use dedup::dedup_genres;
pub use generation::GenerationCounter;

/// Genres shown inline in the now-playing bar.
pub const NOW_PLAYING_LIMIT: usize = 5;
pub const FALLBACK_BATCH: usize = 5;
/// Most related artists ever consulted by the widening step.
pub const FALLBACK_LIMIT: usize = 25;

/// Whether a lookup may still widen over related artists. Widening itself
/// runs at [`Depth::Fallback`], so it never widens again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    NowPlaying,
    ArtistPage,
}

/// What one cycle carries from start to finish.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext {
    pub surface: Surface,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearReason {
    Disabled,
    LocalFile,
    NotATrack,
    NoGenres,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NowPlayingGenres {
    pub track_name: String,
    /// At most [`NOW_PLAYING_LIMIT`] genres with their playlists.
    pub genres: Vec<PlaylistResolution>,
    /// Every distinct genre, for the detail popup.
    pub all_genres: Vec<String>,
    /// Tags from the secondary tag service, for the popup.
    pub secondary_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NowPlaying {
    Genres(NowPlayingGenres),
    Cleared { reason: ClearReason },
    /// A newer cycle started before this one finished.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtistPage {
    Genres {
        artist_id: String,
        genres: Vec<PlaylistResolution>,
    },
    Empty {
        artist_id: String,
    },
    Superseded,
}

pub struct GenreResolver {
    primary: PrimarySource,
    related: Option<Arc<dyn RelatedArtists>>,
    secondary: Option<Arc<dyn TrackTagSource>>,
    playlists: PlaylistResolver,
    store: Arc<Store>,
    now_playing: GenerationCounter,
    artist_page: GenerationCounter,
}

impl GenreResolver {
    pub fn new(primary: PrimarySource, playlists: PlaylistResolver, store: Arc<Store>) -> Self {
        Self {
            primary,
            related: None,
            secondary: None,
            playlists,
            store,
            now_playing: GenerationCounter::new(),
            artist_page: GenerationCounter::new(),
        }
    }

    pub fn with_related(mut self, related: Arc<dyn RelatedArtists>) -> Self {
        self.related = Some(related);
        self
    }

    pub fn with_secondary(mut self, secondary: Arc<dyn TrackTagSource>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn playlists(&self) -> &PlaylistResolver {
        &self.playlists
    }

    /// Starts a now-playing cycle. Call when the track changes, before
    /// awaiting anything, so later changes supersede this one.
    pub fn begin_now_playing(&self) -> ResolutionContext {
        ResolutionContext {
            surface: Surface::NowPlaying,
            generation: self.now_playing.begin(),
        }
    }

    pub fn begin_artist_page(&self) -> ResolutionContext {
        ResolutionContext {
            surface: Surface::ArtistPage,
            generation: self.artist_page.begin(),
        }
    }

    fn is_current(&self, ctx: &ResolutionContext) -> bool {
        match ctx.surface {
            Surface::NowPlaying => self.now_playing.is_current(ctx.generation),
            Surface::ArtistPage => self.artist_page.is_current(ctx.generation),
        }
    }

    pub async fn now_playing(&self, track: &Track) -> NowPlaying {
        let ctx = self.begin_now_playing();
        self.resolve_now_playing(ctx, track).await
    }

    pub async fn resolve_now_playing(&self, ctx: ResolutionContext, track: &Track) -> NowPlaying {
        if let Some(reason) = self.skip_reason(track) {
            debug!("clearing genres for {:?}: {:?}", track.track_name, reason);
            return NowPlaying::Cleared { reason };
        }

        let artist_ids = track.artist_ids();
        let (candidates, secondary) = futures::join!(
            self.collect(&artist_ids, Some(track), Depth::Primary),
            self.secondary_tags(track)
        );

        if !self.is_current(&ctx) {
            return NowPlaying::Superseded;
        }

        let all_genres = dedup_genres(candidates);
        if all_genres.is_empty() {
            info!("no genres found for {:?}", track.track_name);
            return NowPlaying::Cleared {
                reason: ClearReason::NoGenres,
            };
        }

        let shown: Vec<String> = all_genres.iter().take(NOW_PLAYING_LIMIT).cloned().collect();
        let genres = self.playlists.resolve_all(&shown).await;

        if !self.is_current(&ctx) {
            return NowPlaying::Superseded;
        }

        NowPlaying::Genres(NowPlayingGenres {
            track_name: track.track_name.clone(),
            genres,
            all_genres,
            secondary_tags: secondary,
        })
    }

    pub async fn artist_page(&self, artist_id: &str) -> ArtistPage {
        let ctx = self.begin_artist_page();
        self.resolve_artist_page(ctx, artist_id).await
    }

    /// Genres of one artist, uncapped.
    pub async fn resolve_artist_page(&self, ctx: ResolutionContext, artist_id: &str) -> ArtistPage {
        let ids = vec![artist_id.to_string()];
        let candidates = self.collect(&ids, None, Depth::Primary).await;

        if !self.is_current(&ctx) {
            return ArtistPage::Superseded;
        }

        let all_genres = dedup_genres(candidates);
        if all_genres.is_empty() {
            return ArtistPage::Empty {
                artist_id: artist_id.to_string(),
            };
        }

        let genres = self.playlists.resolve_all(&all_genres).await;
        if !self.is_current(&ctx) {
            return ArtistPage::Superseded;
        }

        ArtistPage::Genres {
            artist_id: artist_id.to_string(),
            genres,
        }
    }

    fn skip_reason(&self, track: &Track) -> Option<ClearReason> {
        if !self.store.enabled() {
            Some(ClearReason::Disabled)
        } else if track.is_local || track.uri_type == UriType::Local {
            Some(ClearReason::LocalFile)
        } else if track.uri_type != UriType::Track {
            Some(ClearReason::NotATrack)
        } else {
            None
        }
    }

    /// Primary lookup, plus related-artist widening when it comes back
    /// empty at [`Depth::Primary`]. Candidates are not yet de-duplicated.
    pub fn collect<'a>(
        &'a self,
        artist_ids: &'a [String],
        track: Option<&'a Track>,
        depth: Depth,
    ) -> BoxFuture<'a, Vec<String>> {
        async move {
            let genres = self.primary_genres(artist_ids, track).await;
            if !genres.is_empty() || depth == Depth::Fallback {
                return genres;
            }
            match (&self.primary, artist_ids.first()) {
                (PrimarySource::Artist(_), Some(artist_id)) => self.widen(artist_id).await,
                _ => genres,
            }
        }
        .boxed()
    }

    async fn primary_genres(&self, artist_ids: &[String], track: Option<&Track>) -> Vec<String> {
        match &self.primary {
            PrimarySource::Artist(source) => {
                let lookups = artist_ids.iter().map(|id| source.artist_genres(id));
                join_all(lookups).await.into_iter().flatten().collect()
            }
            PrimarySource::Track(source) => match track {
                Some(track) => source.track_tags(&track.artist_name, &track.track_name).await,
                None => Vec::new(),
            },
        }
    }

    async fn widen(&self, artist_id: &str) -> Vec<String> {
        let Some(related) = &self.related else {
            return Vec::new();
        };
        let related_ids: Vec<String> = match related.related_artist_uris(artist_id).await {
            Some(uris) => uris
                .iter()
                .filter_map(|uri| artist_id_from_uri(uri))
                .map(str::to_string)
                .take(FALLBACK_LIMIT)
                .collect(),
            None => return Vec::new(),
        };

        for (i, batch) in related_ids.chunks(FALLBACK_BATCH).enumerate() {
            let genres = self.collect(batch, None, Depth::Fallback).await;
            if !genres.is_empty() {
                debug!(
                    "borrowed genres for {} from related artists batch {}",
                    artist_id,
                    i + 1
                );
                return genres;
            }
        }
        Vec::new()
    }

    async fn secondary_tags(&self, track: &Track) -> Vec<String> {
        match &self.secondary {
            Some(source) => {
                let tags = source.track_tags(&track.artist_name, &track.track_name).await;
                secondary_tags(tags)
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        playlist::{PlaylistMatch, CURATED_OWNER},
        sources::fakes::{FakeArtists, FakeSearch, FakeTags},
        store::MemoryStorage,
    };

    fn store() -> Arc<Store> {
        Arc::new(Store::open(Arc::new(MemoryStorage::new())))
    }

    fn artist_resolver(artists: Arc<FakeArtists>, search: FakeSearch) -> GenreResolver {
        let store = store();
        let playlists = PlaylistResolver::new(Arc::new(search), store.clone());
        GenreResolver::new(PrimarySource::Artist(artists.clone()), playlists, store)
            .with_related(artists)
    }

    fn track(artist_ids: &[&str]) -> Track {
        Track {
            artist_name: "Daft Punk".to_string(),
            track_name: "One More Time".to_string(),
            artist_uris: artist_ids
                .iter()
                .map(|id| format!("spotify:artist:{}", id))
                .collect(),
            is_local: false,
            uri_type: UriType::Track,
        }
    }

    fn genre_names(result: &NowPlaying) -> Vec<String> {
        match result {
            NowPlaying::Genres(found) => found.genres.iter().map(|g| g.genre.clone()).collect(),
            other => panic!("expected genres, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn daft_punk_keeps_source_order() {
        let artists =
            Arc::new(FakeArtists::default().with_genres("daft", &["House", "French House"]));
        let search = FakeSearch::default().with_result(
            "The Sound of House",
            "spotify:playlist:house",
            "The Sound of House",
            CURATED_OWNER,
        );
        let resolver = artist_resolver(artists, search);

        let result = resolver.now_playing(&track(&["daft"])).await;
        assert_eq!(genre_names(&result), vec!["House", "French House"]);

        let NowPlaying::Genres(found) = result else { unreachable!() };
        assert_eq!(
            found.genres[0].playlist,
            PlaylistMatch::Found("spotify:playlist:house".into())
        );
        assert_eq!(found.genres[1].playlist, PlaylistMatch::NotFound);
    }

    #[tokio::test]
    async fn every_artist_is_looked_up_and_merged() {
        let artists = Arc::new(
            FakeArtists::default()
                .with_genres("a", &["pop", "dance pop"])
                .with_genres("c", &["Pop", "electropop"]),
        );
        let resolver = artist_resolver(artists.clone(), FakeSearch::default());

        // "b" has no genres and must not stop the others
        let result = resolver.now_playing(&track(&["a", "b", "c"])).await;
        assert_eq!(genre_names(&result), vec!["pop", "dance pop", "electropop"]);

        let mut looked_up = artists.lookups();
        looked_up.sort();
        assert_eq!(looked_up, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn inline_list_is_capped_but_popup_keeps_everything() {
        let artists = Arc::new(FakeArtists::default().with_genres(
            "a",
            &["g1", "g2", "g3", "g4", "g5", "g6", "g7"],
        ));
        let resolver = artist_resolver(artists, FakeSearch::default());

        let NowPlaying::Genres(found) = resolver.now_playing(&track(&["a"])).await else {
            panic!("expected genres");
        };
        assert_eq!(found.genres.len(), NOW_PLAYING_LIMIT);
        assert_eq!(found.all_genres.len(), 7);
    }

    #[tokio::test]
    async fn widening_stops_at_first_batch_with_genres() {
        let related: Vec<String> = (0..30).map(|i| format!("r{}", i)).collect();
        let related: Vec<&str> = related.iter().map(String::as_str).collect();
        let artists = Arc::new(
            FakeArtists::default()
                .with_related("lonely", &related)
                .with_genres("r7", &["shoegaze"])
                .with_genres("r12", &["dream pop"]),
        );
        let resolver = artist_resolver(artists.clone(), FakeSearch::default());

        let result = resolver.now_playing(&track(&["lonely"])).await;
        assert_eq!(genre_names(&result), vec!["shoegaze"]);

        // the track's own artist, then r0..r4, then r5..r9
        let lookups = artists.lookups();
        assert_eq!(lookups.len(), 1 + 2 * FALLBACK_BATCH);
        assert!(!lookups.contains(&"r12".to_string()));
    }

    #[tokio::test]
    async fn widening_never_goes_past_the_limit() {
        let related: Vec<String> = (0..40).map(|i| format!("r{}", i)).collect();
        let related: Vec<&str> = related.iter().map(String::as_str).collect();
        let artists = Arc::new(
            FakeArtists::default()
                .with_related("lonely", &related)
                // related artists have related artists too; they are never consulted
                .with_related("r0", &["deep"])
                .with_genres("deep", &["too far"])
                .with_genres("r30", &["out of range"]),
        );
        let resolver = artist_resolver(artists.clone(), FakeSearch::default());

        let result = resolver.now_playing(&track(&["lonely"])).await;
        assert_eq!(
            result,
            NowPlaying::Cleared {
                reason: ClearReason::NoGenres
            }
        );
        assert_eq!(artists.lookups().len(), 1 + FALLBACK_LIMIT);
    }

    #[tokio::test]
    async fn no_related_artists_means_no_genres() {
        let artists = Arc::new(FakeArtists::default());
        let resolver = artist_resolver(artists.clone(), FakeSearch::default());

        let result = resolver.now_playing(&track(&["unknown"])).await;
        assert_eq!(
            result,
            NowPlaying::Cleared {
                reason: ClearReason::NoGenres
            }
        );
        assert_eq!(artists.lookups(), vec!["unknown"]);
    }

    #[tokio::test]
    async fn skipped_tracks_are_cleared_without_lookups() {
        let artists = Arc::new(FakeArtists::default().with_genres("a", &["pop"]));
        let resolver = artist_resolver(artists.clone(), FakeSearch::default());

        let mut local = track(&["a"]);
        local.is_local = true;
        assert_eq!(
            resolver.now_playing(&local).await,
            NowPlaying::Cleared {
                reason: ClearReason::LocalFile
            }
        );

        let mut episode = track(&["a"]);
        episode.uri_type = UriType::Episode;
        assert_eq!(
            resolver.now_playing(&episode).await,
            NowPlaying::Cleared {
                reason: ClearReason::NotATrack
            }
        );

        resolver.store().set_enabled(false);
        assert_eq!(
            resolver.now_playing(&track(&["a"])).await,
            NowPlaying::Cleared {
                reason: ClearReason::Disabled
            }
        );
        assert!(artists.lookups().is_empty());
    }

    #[tokio::test]
    async fn superseded_cycles_publish_nothing() {
        let artists = Arc::new(FakeArtists::default().with_genres("a", &["pop"]));
        let resolver = artist_resolver(artists, FakeSearch::default());

        let stale = resolver.begin_now_playing();
        let fresh = resolver.begin_now_playing();

        assert_eq!(
            resolver.resolve_now_playing(stale, &track(&["a"])).await,
            NowPlaying::Superseded
        );
        assert!(matches!(
            resolver.resolve_now_playing(fresh, &track(&["a"])).await,
            NowPlaying::Genres(_)
        ));
    }

    #[tokio::test]
    async fn artist_page_is_uncapped_and_widens() {
        let many = ["a", "b", "c", "d", "e", "f", "g"];
        let artists = Arc::new(
            FakeArtists::default()
                .with_genres("busy", &many)
                .with_related("quiet", &["busy"]),
        );
        let resolver = artist_resolver(artists, FakeSearch::default());

        match resolver.artist_page("busy").await {
            ArtistPage::Genres { genres, .. } => assert_eq!(genres.len(), many.len()),
            other => panic!("expected genres, got {:?}", other),
        }
        match resolver.artist_page("quiet").await {
            ArtistPage::Genres { artist_id, genres } => {
                assert_eq!(artist_id, "quiet");
                assert_eq!(genres.len(), many.len());
            }
            other => panic!("expected genres, got {:?}", other),
        }
        assert_eq!(
            resolver.artist_page("nobody").await,
            ArtistPage::Empty {
                artist_id: "nobody".to_string()
            }
        );
    }

    #[tokio::test]
    async fn track_tag_source_with_secondary_tags() {
        let tags = Arc::new(FakeTags::default().with_tags(
            "Daft Punk",
            "One More Time",
            &["french house", "House", "house", "2000s"],
        ));
        let store = store();
        let playlists = PlaylistResolver::new(Arc::new(FakeSearch::default()), store.clone());
        let resolver = GenreResolver::new(PrimarySource::Track(tags.clone()), playlists, store)
            .with_secondary(tags);

        let NowPlaying::Genres(found) = resolver.now_playing(&track(&["a"])).await else {
            panic!("expected genres");
        };
        assert_eq!(found.all_genres, vec!["french house", "House", "2000s"]);
        assert_eq!(found.secondary_tags, vec!["french house", "House", "house"]);
        assert_eq!(
            resolver.artist_page("a").await,
            ArtistPage::Empty {
                artist_id: "a".into()
            }
        );
    }
}
