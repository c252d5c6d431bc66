use super::models::{Recording, RecordingSearch};
use crate::error::{Result, SourceError};

pub const MUSICBRAINZ_API_BASE: &str = "https://musicbrainz.org/ws/2";

const USER_AGENT: &str = concat!("spotify-genres/", env!("CARGO_PKG_VERSION"));

pub struct MusicBrainz {
    base_url: String,
    http: reqwest::Client,
}

impl MusicBrainz {
    pub fn new() -> Result<Self> {
        Self::with_base_url(MUSICBRAINZ_API_BASE.to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self> {
        // musicbrainz rejects anonymous clients
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { base_url, http })
    }

    /// Search, then fetch the top hit with its tags.
    pub async fn recording_tags(&self, artist: &str, track: &str) -> Result<Vec<String>> {
        let id = self.search_recording(artist, track).await?;
        let recording = self.get_recording(&id).await?;
        Ok(recording.tag_names())
    }

    /// Id of the top recording matching `artist` and `track`.
    pub async fn search_recording(&self, artist: &str, track: &str) -> Result<String> {
        let query = format!(
            "recording:\"{}\" AND artist:\"{}\"",
            escape_lucene(track),
            escape_lucene(artist)
        );
        let search: RecordingSearch = self
            .http
            .get(format!("{}/recording", self.base_url))
            .query(&[("fmt", "json"), ("limit", "1"), ("query", query.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        search
            .recordings
            .into_iter()
            .next()
            .map(|hit| hit.id)
            .ok_or_else(|| {
                SourceError::not_found("musicbrainz", format!("{} - {}", artist, track))
            })
    }

    pub async fn get_recording(&self, id: &str) -> Result<Recording> {
        // `inc` is `+`-separated and must reach the server unencoded.
        let recording: Recording = self
            .http
            .get(format!(
                "{}/recording/{}?inc=tags+artists&fmt=json",
                self.base_url, id
            ))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(recording)
    }
}

fn escape_lucene(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
