//! Game settings and preferences
//!
//! Persisted through the key-value store under a single JSON key.

use serde::{Deserialize, Serialize};

use crate::audio::AudioManager;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Background music toggle
    pub music_enabled: bool,
    /// Sound effects (and haptics) toggle
    pub sound_enabled: bool,
    /// Equipped ability (`clearScreen`, `defenseBuff`, `rapidFire`)
    pub skill_id: String,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sound_enabled: true,
            skill_id: "clearScreen".to_string(),
            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "village_defense_settings";

    /// Load from storage, defaults on missing or corrupt data
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        save_json(store, Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }

    /// Flip the music toggle; returns the new value
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    /// Flip the sound toggle; returns the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Push the audio preferences into the audio manager
    pub fn apply_to(&self, audio: &mut AudioManager) {
        audio.set_master_volume(self.master_volume);
        audio.set_sfx_volume(self.sfx_volume);
        audio.set_sound_enabled(self.sound_enabled);
        audio.set_music_enabled(self.music_enabled);
    }
}
