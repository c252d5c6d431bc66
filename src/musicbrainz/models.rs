use serde_derive::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct RecordingSearch {
    #[serde(default)]
    pub recordings: Vec<RecordingHit>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RecordingHit {
    pub id: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Recording {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(rename = "artist-credit", default)]
    pub artist_credit: Vec<ArtistCredit>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ArtistCredit {
    pub artist: CreditedArtist,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreditedArtist {
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Tag {
    pub name: String,
}

impl Recording {
    /// The recording's own tags, or the primary credited artist's when the
    /// recording has none.
    pub fn tag_names(&self) -> Vec<String> {
        let tags = if self.tags.is_empty() {
            self.artist_credit
                .first()
                .map(|credit| credit.artist.tags.as_slice())
                .unwrap_or_default()
        } else {
            self.tags.as_slice()
        };
        tags.iter().map(|t| t.name.clone()).collect()
    }
}
