use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

/// Failures reported by the remote adapters.
///
/// None of these reach the pipeline's callers: every adapter collapses them
/// into "no data" at its boundary, so "service down" and "genuinely no
/// genres" look the same from the outside.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify error: {0}")]
    Spotify(#[from] rspotify::ClientError),

    /// The service answered but explicitly reported no match.
    #[error("{service} reported no match: {message}")]
    NotFound { service: &'static str, message: String },

    #[error("invalid Spotify id: {0}")]
    InvalidId(String),
}

impl SourceError {
    pub fn not_found(service: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            service,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
