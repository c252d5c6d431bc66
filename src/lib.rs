//! Genre tags for the now-playing bar and artist pages of a Spotify client.
//!
//! Genres come from one primary source (Spotify artist genres, Last.fm
//! track tags or MusicBrainz recording tags). Each genre is linked to its
//! curated "The Sound of <genre>" playlist when one exists, and those links
//! are cached in the client's local storage.

pub mod display;
pub mod error;
pub mod genres;
pub mod host;
pub mod lastfm;
pub mod musicbrainz;
pub mod playlist;
pub mod sources;
pub mod spotify;
pub mod store;
pub mod track;

pub use error::{Result, SourceError};
pub use genres::{ArtistPage, GenreResolver, NowPlaying};
pub use playlist::{PlaylistMatch, PlaylistResolution, PlaylistResolver};
pub use track::Track;
