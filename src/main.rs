use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use spotify_genres::{
    display::{artist_page_html, link_for, now_playing_html, popup_title, LinkTarget},
    genres::{ArtistPage, GenreResolver, NowPlaying},
    host,
    lastfm::client::LastFm,
    musicbrainz::client::MusicBrainz,
    playlist::{PlaylistMatch, PlaylistResolution, PlaylistResolver},
    sources::PrimarySource,
    spotify::SpotifyCatalog,
    store::{FileStorage, Store},
    track::{artist_id_from_uri, Track, UriType},
};
use tokio::{io::BufReader, sync::mpsc};

#[derive(Parser, Debug)]
#[command(version, about = "Genre tags for the Spotify now-playing bar and artist pages")]
struct Cli {
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    spotify_client_id: Option<String>,

    #[arg(long, env = "SPOTIFY_SECRET_TOKEN", hide_env_values = true)]
    spotify_secret_token: Option<String>,

    /// Enables the Last.fm tag list, and `--source lastfm`.
    #[arg(long, env = "LASTFM_API_KEY", hide_env_values = true)]
    lastfm_api_key: Option<String>,

    /// Where genres come from.
    #[arg(long, value_enum, default_value_t = Source::Spotify)]
    source: Source,

    /// File backing the client's local storage.
    #[arg(long, env = "GENRES_SETTINGS", default_value = "genres-settings.json")]
    settings: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Spotify,
    Lastfm,
    Musicbrainz,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Html,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Genres for the now-playing bar.
    Track {
        #[arg(long)]
        artist: String,
        #[arg(long)]
        title: String,
        /// Credited artists, primary first (repeatable).
        #[arg(long = "artist-uri", required = true)]
        artist_uris: Vec<String>,
    },
    /// Genres for an artist page.
    Artist {
        /// Artist id or `spotify:artist:` URI.
        artist: String,
    },
    /// The curated playlist for one genre.
    Playlist { genre: String },
    /// Show or hide genres.
    Toggle,
    /// Read host events as JSON lines on stdin, print updates as JSON lines.
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let cli = Cli::parse();

    let storage = Arc::new(FileStorage::open(&cli.settings));
    let store = Arc::new(Store::open(storage));

    if let Command::Toggle = cli.command {
        let enabled = !store.enabled();
        store.set_enabled(enabled);
        println!("genres {}", if enabled { "shown" } else { "hidden" });
        return Ok(());
    }

    let resolver = Arc::new(build_resolver(&cli, store).await?);

    match cli.command {
        Command::Track {
            artist,
            title,
            artist_uris,
        } => {
            let track = Track {
                artist_name: artist,
                track_name: title,
                artist_uris,
                is_local: false,
                uri_type: UriType::Track,
            };
            let result = resolver.now_playing(&track).await;
            print_now_playing(&track, &result, cli.format)?;
        }
        Command::Artist { artist } => {
            let artist_id =
                artist_id_from_uri(&artist).with_context(|| format!("bad artist: {}", artist))?;
            let result = resolver.artist_page(artist_id).await;
            print_artist_page(&result, cli.format)?;
        }
        Command::Playlist { genre } => {
            let resolution = resolver.playlists().resolve(&genre).await;
            print_playlist(&resolution, cli.format)?;
        }
        Command::Watch => {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let printer = tokio::spawn(async move {
                while let Some(update) = rx.recv().await {
                    match serde_json::to_string(&update) {
                        Ok(line) => println!("{}", line),
                        Err(e) => log::warn!("could not serialize update: {}", e),
                    }
                }
            });
            host::run(resolver, BufReader::new(tokio::io::stdin()), tx).await?;
            printer.await?;
        }
        Command::Toggle => unreachable!("handled before connecting"),
    }

    Ok(())
}

async fn build_resolver(cli: &Cli, store: Arc<Store>) -> Result<GenreResolver, anyhow::Error> {
    let client_id = cli
        .spotify_client_id
        .as_deref()
        .context("SPOTIFY_CLIENT_ID not set")?;
    let secret_token = cli
        .spotify_secret_token
        .as_deref()
        .context("SPOTIFY_SECRET_TOKEN not set")?;
    let catalog = Arc::new(SpotifyCatalog::connect(client_id, secret_token).await?);
    let lastfm = cli
        .lastfm_api_key
        .clone()
        .map(|api_key| Arc::new(LastFm::new(api_key)));

    let primary = match cli.source {
        Source::Spotify => PrimarySource::Artist(catalog.clone()),
        Source::Lastfm => PrimarySource::Track(
            lastfm
                .clone()
                .context("--source lastfm needs LASTFM_API_KEY")?,
        ),
        Source::Musicbrainz => PrimarySource::Track(Arc::new(MusicBrainz::new()?)),
    };
    log::info!("genre source: {:?}", cli.source);

    let playlists = PlaylistResolver::new(catalog.clone(), store.clone());
    let mut resolver = GenreResolver::new(primary, playlists, store).with_related(catalog);
    if let Some(lastfm) = lastfm {
        resolver = resolver.with_secondary(lastfm);
    }
    Ok(resolver)
}

fn describe(resolution: &PlaylistResolution) -> String {
    let link = link_for(resolution);
    let target = match &link.target {
        LinkTarget::Playlist(path) | LinkTarget::Search(path) => path.clone(),
    };
    match &resolution.playlist {
        PlaylistMatch::Found(uri) => format!("{:<24} {} ({})", link.label, target, uri),
        PlaylistMatch::Ambiguous(uri) => {
            format!("{:<24} {} (closest: {})", link.label, target, uri)
        }
        PlaylistMatch::NotFound => format!("{:<24} {} (no playlist)", link.label, target),
    }
}

fn print_now_playing(track: &Track, result: &NowPlaying, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(result)?),
        Format::Html => {
            if let NowPlaying::Genres(found) = result {
                println!("{}", now_playing_html(&found.genres));
            }
        }
        Format::Text => match result {
            NowPlaying::Genres(found) => {
                println!("{}", popup_title(&track.track_name));
                for resolution in found.genres.iter() {
                    println!("  {}", describe(resolution));
                }
                if found.all_genres.len() > found.genres.len() {
                    println!("  more: {}", found.all_genres[found.genres.len()..].join(", "));
                }
                if !found.secondary_tags.is_empty() {
                    println!("Last FM Tags: {}", found.secondary_tags.join(", "));
                }
            }
            NowPlaying::Cleared { reason } => println!("no genres ({:?})", reason),
            NowPlaying::Superseded => {}
        },
    }
    Ok(())
}

fn print_artist_page(result: &ArtistPage, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(result)?),
        Format::Html => {
            if let ArtistPage::Genres { genres, .. } = result {
                println!("{}", artist_page_html(genres));
            }
        }
        Format::Text => match result {
            ArtistPage::Genres { artist_id, genres } => {
                println!("Artist Genres ({})", artist_id);
                for resolution in genres.iter() {
                    println!("  {}", describe(resolution));
                }
            }
            ArtistPage::Empty { artist_id } => println!("no genres for {}", artist_id),
            ArtistPage::Superseded => {}
        },
    }
    Ok(())
}

fn print_playlist(resolution: &PlaylistResolution, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(resolution)?),
        Format::Html => println!("{}", now_playing_html(std::slice::from_ref(resolution))),
        Format::Text => println!("{}", describe(resolution)),
    }
    Ok(())
}
