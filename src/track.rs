use std::collections::HashMap;

use serde_derive::{Deserialize, Serialize};

/// Hosts report at most this many artists per track (`artist_uri`,
/// `artist_uri:1` .. `artist_uri:9`).
pub const MAX_TRACK_ARTISTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UriType {
    Track,
    Episode,
    Local,
    Other,
}

impl UriType {
    /// Type segment of a `spotify:<type>:<id>` URI.
    pub fn from_uri(uri: &str) -> Self {
        match uri.split(':').nth(1) {
            Some("track") => UriType::Track,
            Some("episode") => UriType::Episode,
            Some("local") => UriType::Local,
            _ => UriType::Other,
        }
    }
}

/// The now-playing item as the host describes it. Immutable for the
/// duration of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub artist_name: String,
    pub track_name: String,
    pub artist_uris: Vec<String>,
    pub is_local: bool,
    pub uri_type: UriType,
}

impl Track {
    /// Builds a track from the host's flat player metadata.
    pub fn from_metadata(metadata: &HashMap<String, String>) -> Self {
        let mut artist_uris = Vec::new();
        if let Some(uri) = metadata.get("artist_uri") {
            artist_uris.push(uri.clone());
            for i in 1..MAX_TRACK_ARTISTS {
                match metadata.get(&format!("artist_uri:{}", i)) {
                    Some(uri) if !uri.is_empty() => artist_uris.push(uri.clone()),
                    _ => break,
                }
            }
        }

        let uri_type = metadata
            .get("uri")
            .map(|uri| UriType::from_uri(uri))
            .unwrap_or(UriType::Other);

        Track {
            artist_name: metadata.get("artist_name").cloned().unwrap_or_default(),
            track_name: metadata.get("title").cloned().unwrap_or_default(),
            artist_uris,
            is_local: metadata.get("is_local").map(|v| v == "true").unwrap_or(false),
            uri_type,
        }
    }

    pub fn primary_artist_uri(&self) -> Option<&str> {
        self.artist_uris.first().map(String::as_str)
    }

    /// Ids of every credited artist, in credit order.
    pub fn artist_ids(&self) -> Vec<String> {
        self.artist_uris
            .iter()
            .take(MAX_TRACK_ARTISTS)
            .filter_map(|uri| artist_id_from_uri(uri))
            .map(str::to_string)
            .collect()
    }
}

/// `spotify:artist:<id>` -> `<id>`. Bare ids pass through unchanged.
pub fn artist_id_from_uri(uri: &str) -> Option<&str> {
    let id = if uri.contains(':') {
        uri.split(':').nth(2)?
    } else {
        uri
    };
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// `/artist/<id>` -> `<id>`; any other navigation path is not an artist page.
pub fn artist_id_from_path(pathname: &str) -> Option<&str> {
    let segments: Vec<&str> = pathname.split('/').collect();
    if segments.len() == 3 && segments[0].is_empty() && segments[1] == "artist" {
        let id = segments[2];
        if !id.is_empty() {
            return Some(id);
        }
    }
    None
}
