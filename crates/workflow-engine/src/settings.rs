//! Engine settings
//!
//! Tunables shared by hosts of the engine. Settings are stored as JSON and
//! every field falls back to its default, so partial files are fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::Result;

/// Settings for a workflow editing host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    /// Maximum undo snapshots per session
    pub max_undo_snapshots: usize,
    /// Directory workflow configs are persisted to (none = memory only)
    pub persist_dir: Option<PathBuf>,
    /// Hex characters in the random part of generated block ids
    pub id_suffix_length: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_undo_snapshots: defaults::MAX_UNDO_SNAPSHOTS,
            persist_dir: None,
            id_suffix_length: defaults::ID_SUFFIX_LENGTH,
        }
    }
}

impl EngineSettings {
    /// Load settings from a JSON file
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a JSON file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = EngineSettings::load(temp_dir.path().join("none.json")).unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"maxUndoSnapshots": 5}"#).unwrap();

        let settings = EngineSettings::load(&path).unwrap();
        assert_eq!(settings.max_undo_snapshots, 5);
        assert_eq!(settings.id_suffix_length, defaults::ID_SUFFIX_LENGTH);
        assert!(settings.persist_dir.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");
        let settings = EngineSettings {
            persist_dir: Some(temp_dir.path().join("configs")),
            ..Default::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(EngineSettings::load(&path).unwrap(), settings);
    }
}
