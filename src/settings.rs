//! Audio preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Background music loop
    pub music_enabled: bool,
    /// Jump/collect/crash/level-up cues
    pub sfx_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sfx_enabled: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "data_runner_settings";

    /// Flip the music flag, returning the new value
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    /// Flip the sound effects flag, returning the new value
    pub fn toggle_sfx(&mut self) -> bool {
        self.sfx_enabled = !self.sfx_enabled;
        self.sfx_enabled
    }

    /// Decode a stored JSON blob, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match storage {
            Some(storage) => {
                if storage.set_item(Self::STORAGE_KEY, &self.to_json()).is_err() {
                    log::warn!("Failed to write settings");
                }
            }
            None => log::warn!("LocalStorage unavailable, settings not persisted"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
        log::debug!("Settings not persisted on native: {}", self.to_json());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_audio() {
        let s = Settings::default();
        assert!(s.music_enabled);
        assert!(s.sfx_enabled);
    }

    #[test]
    fn test_toggles() {
        let mut s = Settings::default();
        assert!(!s.toggle_music());
        assert!(!s.music_enabled);
        assert!(s.sfx_enabled);
        assert!(!s.toggle_sfx());
        assert!(s.toggle_music());
    }

    #[test]
    fn test_json_roundtrip() {
        let s = Settings {
            music_enabled: false,
            sfx_enabled: true,
        };
        assert_eq!(Settings::from_json(&s.to_json()), s);
    }

    #[test]
    fn test_partial_and_corrupt_json() {
        let partial = Settings::from_json(r#"{"music_enabled":false}"#);
        assert!(!partial.music_enabled);
        assert!(partial.sfx_enabled);

        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }
}
