//! Key-value persistence
//!
//! The game treats storage as an opaque string-keyed store. Values are JSON;
//! anything missing or unparsable reads as absent so callers fall back to
//! defaults.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage key for the unlocked-level list
pub const UNLOCKED_LEVELS_KEY: &str = "unlockedLevels";

/// Opaque get/set string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// `None` when the page has no usable LocalStorage
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("LocalStorage write failed for '{key}'");
        }
    }
}

/// Read and decode a JSON value; corrupt data is logged and treated as absent
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt '{key}' in storage: {e}");
            None
        }
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("Could not encode '{key}': {e}"),
    }
}

/// Levels the player may select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    unlocked: Vec<u32>,
}

impl Default for Progress {
    fn default() -> Self {
        Self { unlocked: vec![1] }
    }
}

impl Progress {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Vec<u32>>(store, UNLOCKED_LEVELS_KEY) {
            Some(mut unlocked) => {
                if !unlocked.contains(&1) {
                    unlocked.insert(0, 1);
                }
                Self { unlocked }
            }
            None => Self::default(),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        save_json(store, UNLOCKED_LEVELS_KEY, &self.unlocked);
    }

    pub fn is_unlocked(&self, level_id: u32) -> bool {
        self.unlocked.contains(&level_id)
    }

    pub fn unlocked(&self) -> &[u32] {
        &self.unlocked
    }

    /// Returns true if the level was newly unlocked
    pub fn unlock(&mut self, level_id: u32) -> bool {
        if self.is_unlocked(level_id) {
            return false;
        }
        self.unlocked.push(level_id);
        log::info!("Unlocked level {level_id}");
        true
    }
}
