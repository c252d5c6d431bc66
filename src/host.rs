//! Host event loop: player and navigation events in (one JSON object per
//! line), genre updates out.
//!
//! ```text
//! {"type": "songchange", "metadata": {"artist_uri": "spotify:artist:...", "uri": "spotify:track:...", ...}}
//! {"type": "navigate", "pathname": "/artist/4tZwfgrHOc3mvqYlEYSvVi"}
//! {"type": "toggle"}
//! ```

use std::{collections::HashMap, sync::Arc};

use log::{debug, info, warn};
use serde_derive::{Deserialize, Serialize};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::UnboundedSender,
    task::JoinSet,
};

use crate::{
    display::{artist_page_html, now_playing_html, popup_title},
    genres::{ArtistPage, GenreResolver, NowPlaying},
    track::{artist_id_from_path, Track},
};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostEvent {
    Songchange { metadata: HashMap<String, String> },
    Navigate { pathname: String },
    Toggle,
}

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "surface", rename_all = "snake_case")]
pub enum GenreUpdate {
    NowPlaying {
        result: NowPlaying,
        title: String,
        html: String,
    },
    ArtistPage {
        result: ArtistPage,
        html: String,
    },
    Toggled {
        enabled: bool,
    },
}

struct EventLoop {
    resolver: Arc<GenreResolver>,
    updates: UnboundedSender<GenreUpdate>,
    tasks: JoinSet<()>,
    last_track: Option<Track>,
}

impl EventLoop {
    fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::Songchange { metadata } => {
                let track = Track::from_metadata(&metadata);
                self.last_track = Some(track.clone());
                self.now_playing(track);
            }
            HostEvent::Navigate { pathname } => match artist_id_from_path(&pathname) {
                Some(artist_id) => self.artist_page(artist_id.to_string()),
                None => debug!("ignoring navigation to {}", pathname),
            },
            HostEvent::Toggle => {
                let store = self.resolver.store();
                let enabled = !store.enabled();
                store.set_enabled(enabled);
                info!("genres {}", if enabled { "shown" } else { "hidden" });
                let _ = self.updates.send(GenreUpdate::Toggled { enabled });
                if let Some(track) = self.last_track.clone() {
                    self.now_playing(track);
                }
            }
        }
    }

    fn now_playing(&mut self, track: Track) {
        // the generation is taken now, so any later event supersedes this one
        let ctx = self.resolver.begin_now_playing();
        let resolver = self.resolver.clone();
        let updates = self.updates.clone();
        self.tasks.spawn(async move {
            let result = resolver.resolve_now_playing(ctx, &track).await;
            let html = match &result {
                NowPlaying::Superseded => {
                    debug!("dropping stale genres for {:?}", track.track_name);
                    return;
                }
                NowPlaying::Genres(found) => now_playing_html(&found.genres),
                NowPlaying::Cleared { .. } => String::new(),
            };
            let _ = updates.send(GenreUpdate::NowPlaying {
                result,
                title: popup_title(&track.track_name),
                html,
            });
        });
    }

    fn artist_page(&mut self, artist_id: String) {
        let ctx = self.resolver.begin_artist_page();
        let resolver = self.resolver.clone();
        let updates = self.updates.clone();
        self.tasks.spawn(async move {
            let result = resolver.resolve_artist_page(ctx, &artist_id).await;
            let html = match &result {
                ArtistPage::Superseded => return,
                ArtistPage::Genres { genres, .. } => artist_page_html(genres),
                ArtistPage::Empty { .. } => String::new(),
            };
            let _ = updates.send(GenreUpdate::ArtistPage { result, html });
        });
    }
}

/// Reads events until `input` is exhausted, then waits for in-flight
/// resolutions. Malformed lines are logged and skipped.
pub async fn run<R>(
    resolver: Arc<GenreResolver>,
    input: R,
    updates: UnboundedSender<GenreUpdate>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut event_loop = EventLoop {
        resolver,
        updates,
        tasks: JoinSet::new(),
        last_track: None,
    };

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<HostEvent>(line) {
            Ok(event) => event_loop.dispatch(event),
            Err(e) => warn!("skipping malformed host event: {}", e),
        }
    }

    while let Some(joined) = event_loop.tasks.join_next().await {
        if let Err(e) = joined {
            warn!("genre resolution task failed: {}", e);
        }
    }
    Ok(())
}
