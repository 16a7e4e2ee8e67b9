//! Game settings and preferences
//!
//! Stored as a JSON file next to the high-score table. Missing fields take
//! their defaults so older files keep loading.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Flow ===
    /// Start a new game immediately instead of showing the title screen
    pub skip_titles: bool,

    // === Debug ===
    /// Honour the invincibility toggle button
    pub allow_invincibility_toggle: bool,

    /// Seed for the stage RNG
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            skip_titles: false,
            allow_invincibility_toggle: false,
            seed: 0,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from `path`
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "skip_titles": true, "seed": 42 }"#).unwrap();
        assert!(settings.skip_titles);
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.music_volume, Settings::default().music_volume);
        assert!(!settings.allow_invincibility_toggle);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("vortexion-settings-{}.json", std::process::id()));
        let settings = Settings {
            muted: true,
            seed: 9,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }
}
