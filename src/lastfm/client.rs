use log::debug;

use super::models::{TopTags, TrackInfoResponse};
use crate::error::{Result, SourceError};

pub const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";

pub struct LastFm {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl LastFm {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(LASTFM_API_BASE.to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    /// `track.getInfo`; one request, no retry.
    pub async fn get_track_info(&self, artist: &str, track: &str) -> Result<TopTags> {
        let response: TrackInfoResponse = self
            .http
            .get(&self.base_url)
            .query(&[
                ("method", "track.getInfo"),
                ("api_key", self.api_key.as_str()),
                ("artist", artist),
                ("track", track),
                ("format", "json"),
            ])
            .send()
            .await?
            .json()
            .await?;

        match response {
            TrackInfoResponse::Error { error, message } => {
                debug!("last.fm error {} for {} - {}: {}", error, artist, track, message);
                Err(SourceError::not_found("last.fm", message))
            }
            TrackInfoResponse::Track { track } => Ok(track.toptags.unwrap_or_default()),
        }
    }
}
