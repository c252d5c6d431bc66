use std::sync::Arc;

use serde_json::{json, Value};
use spotify_genres::{
    playlist::{PlaylistMatch, PlaylistResolver, CURATED_OWNER},
    sources::{PlaylistSearch, PlaylistSummary},
    store::{FileStorage, Storage, Store, DEFAULT_POP_PLAYLIST, SETTINGS_KEY},
    Result,
};

struct OnePlaylist;

#[async_trait::async_trait]
impl PlaylistSearch for OnePlaylist {
    async fn search_playlists(&self, query: &str, _limit: u32) -> Result<Vec<PlaylistSummary>> {
        Ok(vec![PlaylistSummary {
            uri: "spotify:playlist:1yrjCIDsg5EZ3pjG5GjOIw".to_string(),
            name: query.to_string(),
            owner_id: CURATED_OWNER.to_string(),
        }])
    }
}

fn stored_document(path: &std::path::Path) -> Value {
    let slots: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    serde_json::from_str(slots[SETTINGS_KEY].as_str().unwrap()).unwrap()
}

#[test]
fn corrupt_settings_are_replaced_by_defaults_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let mut slots = serde_json::Map::new();
    slots.insert(SETTINGS_KEY.to_string(), json!("{not json"));
    std::fs::write(&path, Value::Object(slots).to_string()).unwrap();

    let store = Store::open(Arc::new(FileStorage::open(&path)));
    assert!(store.enabled());
    assert_eq!(
        stored_document(&path),
        json!({ "state": true, "cached": { "pop": DEFAULT_POP_PLAYLIST } })
    );
}

#[test]
fn unreadable_storage_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "garbage").unwrap();

    let storage = FileStorage::open(&path);
    assert_eq!(storage.get(SETTINGS_KEY), None);
}

#[tokio::test]
async fn cached_playlists_survive_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let store = Arc::new(Store::open(Arc::new(FileStorage::open(&path))));
        let resolver = PlaylistResolver::new(Arc::new(OnePlaylist), store);
        let resolution = resolver.resolve("Indie Rock").await;
        assert_eq!(
            resolution.playlist,
            PlaylistMatch::Found("spotify:playlist:1yrjCIDsg5EZ3pjG5GjOIw".to_string())
        );
    }

    let reopened = Store::open(Arc::new(FileStorage::open(&path)));
    assert_eq!(
        reopened.get_cached("indierock").as_deref(),
        Some("spotify:playlist:1yrjCIDsg5EZ3pjG5GjOIw")
    );
    assert_eq!(
        stored_document(&path)["cached"]["pop"],
        json!(DEFAULT_POP_PLAYLIST)
    );
}
