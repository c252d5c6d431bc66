use serde_derive::Deserialize;

/// `track.getInfo` answers either with the track or with an error object;
/// the error shape is how the service says "not found".
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum TrackInfoResponse {
    Error { error: i32, message: String },
    Track { track: TrackInfo },
}

#[derive(Deserialize, Debug, Clone)]
pub struct TrackInfo {
    pub name: String,
    #[serde(default)]
    pub toptags: Option<TopTags>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TopTags {
    #[serde(default)]
    pub tag: Vec<Tag>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}
