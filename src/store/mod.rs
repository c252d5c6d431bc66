//! Persisted plugin settings and the genre -> playlist cache.
//!
//! The whole configuration lives in one storage slot as a JSON document
//! `{ "state": bool, "cached": { key: uri } }`. It is read once at startup,
//! defaulted key by key, and written back on every mutation.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use log::{info, warn};
use serde_derive::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};

pub const SETTINGS_KEY: &str = "showGenre:settings";

/// Curated "The Sound of Pop" playlist, shipped pre-cached.
pub const DEFAULT_POP_PLAYLIST: &str = "spotify:playlist:6gS3HhOiI17QNojjPuPzqc";

pub type Document = Map<String, Value>;

pub fn default_document() -> Document {
    let mut doc = Document::new();
    doc.insert("state".to_string(), Value::Bool(true));
    doc.insert("cached".to_string(), json!({ "pop": DEFAULT_POP_PLAYLIST }));
    doc
}

/// Reads the stored document. Anything that is not a JSON object is
/// treated as corruption: the slot is reset to `{}` and an empty document
/// is returned.
pub fn load(storage: &dyn Storage) -> Document {
    let raw = storage.get(SETTINGS_KEY).unwrap_or_else(|| "{}".to_string());
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(doc)) => doc,
        Ok(_) | Err(_) => {
            warn!("stored settings are corrupt, resetting them");
            storage.set(SETTINGS_KEY, "{}");
            Document::new()
        }
    }
}

/// Copies every top-level key missing from `doc` out of `defaults`.
/// Nested mappings are taken as they are, never merged entry by entry.
pub fn merge_defaults(mut doc: Document, defaults: &Document) -> Document {
    for (key, value) in defaults {
        if !doc.contains_key(key) {
            doc.insert(key.clone(), value.clone());
        }
    }
    doc
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub state: bool,
    pub cached: BTreeMap<String, String>,
    /// Keys this version does not know about, kept so saving does not drop them.
    #[serde(flatten)]
    pub extra: Document,
}

impl Settings {
    fn from_document(mut doc: Document) -> Self {
        let state = match doc.remove("state") {
            Some(Value::Bool(state)) => state,
            other => {
                if other.is_some() {
                    warn!("settings field `state` is not a boolean, using the default");
                }
                true
            }
        };

        let cached = doc
            .remove("cached")
            .and_then(|value| match serde_json::from_value(value) {
                Ok(cached) => Some(cached),
                Err(e) => {
                    warn!("settings field `cached` is malformed ({}), using the default", e);
                    None
                }
            })
            .unwrap_or_else(|| {
                BTreeMap::from([("pop".to_string(), DEFAULT_POP_PLAYLIST.to_string())])
            });

        Settings {
            state,
            cached,
            extra: doc,
        }
    }
}

pub struct Store {
    storage: Arc<dyn Storage>,
    settings: Mutex<Settings>,
}

impl Store {
    /// Loads, fills in defaults and writes the result straight back so the
    /// stored document is always complete.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let doc = merge_defaults(load(storage.as_ref()), &default_document());
        let store = Store {
            storage,
            settings: Mutex::new(Settings::from_document(doc)),
        };
        store.save();

        let settings = store.settings();
        info!(
            "settings loaded: enabled={}, {} cached playlists",
            settings.state,
            settings.cached.len()
        );
        store
    }

    fn lock(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn settings(&self) -> Settings {
        self.lock().clone()
    }

    pub fn enabled(&self) -> bool {
        self.lock().state
    }

    pub fn set_enabled(&self, enabled: bool) {
        let mut settings = self.lock();
        settings.state = enabled;
        self.save_patch("state", Value::Bool(enabled));
    }

    pub fn get_cached(&self, key: &str) -> Option<String> {
        self.lock().cached.get(key).cloned()
    }

    /// Adds a permanent cache entry and persists the `cached` mapping.
    pub fn put_cached(&self, key: &str, uri: &str) {
        let mut settings = self.lock();
        settings.cached.insert(key.to_string(), uri.to_string());
        match serde_json::to_value(&settings.cached) {
            Ok(cached) => self.save_patch("cached", cached),
            Err(e) => warn!("could not serialize playlist cache: {}", e),
        }
    }

    /// Overwrites the stored document with the in-memory settings.
    pub fn save(&self) {
        let settings = self.lock();
        match serde_json::to_string(&*settings) {
            Ok(text) => self.storage.set(SETTINGS_KEY, &text),
            Err(e) => warn!("could not serialize settings: {}", e),
        }
    }

    /// Re-reads the stored document, replaces one key and writes it back.
    pub fn save_patch(&self, key: &str, value: Value) {
        let mut doc = load(self.storage.as_ref());
        doc.insert(key.to_string(), value);
        match serde_json::to_string(&doc) {
            Ok(text) => self.storage.set(SETTINGS_KEY, &text),
            Err(e) => warn!("could not serialize settings: {}", e),
        }
    }
}
