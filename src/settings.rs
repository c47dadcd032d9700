//! Persisted user settings
//!
//! Stored as JSON. Location is `$ETUDE_SETTINGS` when set, otherwise
//! `~/.etude.json`, falling back to `./etude.json` without a home directory.

use anyhow::{Context, Result};
use etude_core::ExerciseConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const FILE_NAME: &str = ".etude.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub exercise: ExerciseConfig,
    pub auto_key_progression: bool,
    /// Input port to reconnect to at startup
    pub midi_port: Option<String>,
}

impl Settings {
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os("ETUDE_SETTINGS") {
            return PathBuf::from(path);
        }
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(FILE_NAME),
            None => PathBuf::from("etude.json"),
        }
    }

    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Missing or unreadable files give the defaults
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No settings file, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid settings file");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etude_core::{ArpeggioOctaves, ArpeggioType, HandSelection, Key, PracticeMode};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("etude-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = temp_path("round-trip");
        let settings = Settings {
            exercise: ExerciseConfig::default()
                .with_key(Key::DSharp)
                .with_hands(HandSelection::Both)
                .with_mode(PracticeMode::Arpeggio {
                    arpeggio: ArpeggioType::Minor,
                    octaves: ArpeggioOctaves::Two,
                }),
            auto_key_progression: true,
            midi_port: Some("Digital Piano".to_string()),
        };

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let loaded = Settings::load_from(&temp_path("does-not-exist"));
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{ not json").unwrap();
        let loaded = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, r#"{ "auto_key_progression": true }"#).unwrap();
        let loaded = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);

        assert!(loaded.auto_key_progression);
        assert_eq!(loaded.exercise, ExerciseConfig::default());
        assert_eq!(loaded.midi_port, None);
    }
}
