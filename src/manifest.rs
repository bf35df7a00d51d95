use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MANIFEST_FILE_NAME;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameManifest {
    pub game_names: Vec<String>,
    pub number_of_games: usize,
}

impl GameManifest {
    pub fn new(game_names: Vec<String>) -> Self {
        let number_of_games = game_names.len();
        Self {
            game_names,
            number_of_games,
        }
    }
}

pub struct ManifestWriter {
    file_name: String,
}

impl ManifestWriter {
    pub fn new() -> Self {
        Self {
            file_name: MANIFEST_FILE_NAME.to_string(),
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn manifest_path(&self, target_root: &Path) -> PathBuf {
        target_root.join(&self.file_name)
    }

    /// Writes `manifest` into `target_root`, replacing any previous file in place.
    pub fn write_manifest(&self, target_root: &Path, manifest: &GameManifest) -> Result<PathBuf> {
        let manifest_path = self.manifest_path(target_root);

        // Serialize manifest to JSON
        let manifest_json = serde_json::to_string_pretty(manifest)
            .context("Failed to serialize manifest to JSON")?;

        // Overwrite in place
        fs::write(&manifest_path, manifest_json)
            .with_context(|| format!("Failed to write manifest to {}", manifest_path.display()))?;

        Ok(manifest_path)
    }

    pub fn read_manifest(&self, manifest_path: &Path) -> Result<GameManifest> {
        let manifest_content = fs::read_to_string(manifest_path)
            .with_context(|| format!("Failed to read manifest from {}", manifest_path.display()))?;

        let manifest: GameManifest = serde_json::from_str(&manifest_content)
            .with_context(|| format!("Failed to parse manifest JSON from {}", manifest_path.display()))?;

        Ok(manifest)
    }
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_json_keys() {
        let manifest = GameManifest::new(vec!["foo".to_string(), "baz_extra".to_string()]);
        let value = serde_json::to_value(&manifest).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "gameNames": ["foo", "baz_extra"],
                "numberOfGames": 2
            })
        );
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = GameManifest::new(Vec::new());
        assert_eq!(manifest.number_of_games, 0);
        assert!(manifest.game_names.is_empty());
    }

    #[test]
    fn test_write_overwrites_previous_manifest() {
        let tmp = TempDir::new().unwrap();
        let writer = ManifestWriter::new();

        writer
            .write_manifest(tmp.path(), &GameManifest::new(vec!["old".to_string()]))
            .unwrap();
        let path = writer
            .write_manifest(tmp.path(), &GameManifest::new(vec!["pong".to_string(), "chess".to_string()]))
            .unwrap();

        assert_eq!(path, tmp.path().join("metadata.json"));
        let manifest = writer.read_manifest(&path).unwrap();
        assert_eq!(manifest.game_names, vec!["pong", "chess"]);
        assert_eq!(manifest.number_of_games, 2);
    }

    #[test]
    fn test_read_rejects_malformed_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        fs::write(&path, "{\"gameNames\": 3}").unwrap();

        assert!(ManifestWriter::new().read_manifest(&path).is_err());
    }
}
