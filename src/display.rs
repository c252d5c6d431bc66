//! What the host UI receives: labels, link targets and the HTML snippets
//! injected into the now-playing bar and the artist page header.

use regex::Regex;
use serde_derive::Serialize;

use crate::playlist::{PlaylistMatch, PlaylistResolution};

pub const SEPARATOR_HTML: &str = "<span>, </span>";

/// Where clicking a genre leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum LinkTarget {
    /// `/playlist/<id>`
    Playlist(String),
    /// `/search/<genre>/playlists`
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreLink {
    pub genre: String,
    pub label: String,
    pub uri: Option<String>,
    pub target: LinkTarget,
}

/// Uppercases the first letter and every letter after a run of spaces or
/// hyphens: "french house" -> "French House", "lo-fi" -> "Lo-Fi".
pub fn display_label(genre: &str) -> String {
    let mut label = String::with_capacity(genre.len());
    let mut boundary = true;
    for c in genre.chars() {
        if boundary && c.is_alphanumeric() {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        boundary = c.is_whitespace() || c == '-';
    }
    label
}

pub fn search_path(genre: &str) -> String {
    format!("/search/{}/playlists", genre)
}

pub fn link_for(resolution: &PlaylistResolution) -> GenreLink {
    let target = match &resolution.playlist {
        PlaylistMatch::Found(uri) => match uri.rsplit(':').next() {
            Some(id) if !id.is_empty() => LinkTarget::Playlist(format!("/playlist/{}", id)),
            _ => LinkTarget::Search(search_path(&resolution.genre)),
        },
        PlaylistMatch::Ambiguous(_) | PlaylistMatch::NotFound => {
            LinkTarget::Search(search_path(&resolution.genre))
        }
    };
    GenreLink {
        genre: resolution.genre.clone(),
        label: display_label(&resolution.genre),
        uri: resolution.uri().map(str::to_string),
        target,
    }
}

/// Links for inline display. Genres with no playlist at all are left out
/// here; the popup still lists them.
pub fn inline_links(resolutions: &[PlaylistResolution]) -> Vec<GenreLink> {
    resolutions
        .iter()
        .filter(|r| r.playlist != PlaylistMatch::NotFound)
        .map(link_for)
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn anchor(link: &GenreLink, class: Option<&str>, font_size: &str) -> String {
    let class = class
        .map(|c| format!(" class=\"{}\"", c))
        .unwrap_or_default();
    let href = match (&link.target, &link.uri) {
        (LinkTarget::Playlist(_), Some(uri)) => escape_html(uri),
        _ => "#".to_string(),
    };
    let search = match &link.target {
        LinkTarget::Search(path) => format!(" data-search=\"{}\"", escape_html(path)),
        LinkTarget::Playlist(_) => String::new(),
    };
    format!(
        "<a{} href=\"{}\"{} style=\"color: var(--spice-subtext); font-size: {}\">{}</a>",
        class,
        href,
        search,
        font_size,
        escape_html(&link.label)
    )
}

/// The now-playing bar snippet.
pub fn now_playing_html(resolutions: &[PlaylistResolution]) -> String {
    inline_links(resolutions)
        .iter()
        .map(|link| anchor(link, None, "12px"))
        .collect::<Vec<_>>()
        .join(SEPARATOR_HTML)
}

/// The artist page header snippet.
pub fn artist_page_html(resolutions: &[PlaylistResolution]) -> String {
    let links = inline_links(resolutions)
        .iter()
        .map(|link| anchor(link, Some("main-entityHeader-genreLink"), "1rem"))
        .collect::<Vec<_>>()
        .join(SEPARATOR_HTML);
    format!("<span>Artist Genres : </span>{}", links)
}

/// Popup title: the track name without "(feat. ...)", "[Live]",
/// " - Remastered" or ", Pt. 2" style suffixes.
pub fn popup_title(track_name: &str) -> String {
    let patterns = [r"\(.+?\)", r"\[.+?\]", r"\s-\s.+?$", r",.+?$"];
    let mut title = track_name.to_string();
    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            title = re.replace_all(&title, "").to_string();
        }
    }
    format!("Genres of \"{}\"", title.trim())
}
