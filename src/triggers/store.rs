//! Persistence collaborator for user-defined trigger phrases.
//!
//! The engine never touches storage; the composition root loads phrases
//! through a [`TriggerStore`] and hands the in-memory set to the engine.

use crate::defaults;
use crate::error::{Result, VoicecueError};
use crate::triggers::phrase::{TriggerId, TriggerPhrase};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Load/save contract for persisted trigger phrases.
pub trait TriggerStore {
    /// Load stored phrases in their saved order. A missing store is empty.
    fn load(&self) -> Result<Vec<TriggerPhrase>>;

    /// Replace the stored phrases.
    fn save(&self, phrases: &[TriggerPhrase]) -> Result<()>;
}

/// On-disk layout of the trigger file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoreFile {
    /// Next numeric suffix for `user-N` ids. Never decreases, so removed ids
    /// are not reused.
    next_id: u64,
    phrases: Vec<StoredPhrase>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPhrase {
    id: TriggerId,
    phrase: String,
}

/// TOML-file trigger store.
#[derive(Debug, Clone)]
pub struct TomlTriggerStore {
    path: PathBuf,
}

impl TomlTriggerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `~/.config/voicecue/triggers.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("voicecue").join("triggers.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id to assign to the next phrase added to this store.
    pub fn next_id(&self) -> Result<TriggerId> {
        let file = self.read_file()?;
        let n = file.next_id.max(next_suffix(&file.phrases));
        Ok(TriggerId::numbered(defaults::USER_TRIGGER_ID_PREFIX, n))
    }

    fn read_file(&self) -> Result<StoreFile> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreFile::default());
            }
            Err(e) => return Err(self.store_error(e)),
        };
        toml::from_str(&contents).map_err(|e| self.store_error(e))
    }

    fn store_error(&self, e: impl std::fmt::Display) -> VoicecueError {
        VoicecueError::TriggerStore {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

/// One past the largest numeric `user-N` suffix in `phrases`.
fn next_suffix(phrases: &[StoredPhrase]) -> u64 {
    let prefix = format!("{}-", defaults::USER_TRIGGER_ID_PREFIX);
    phrases
        .iter()
        .filter_map(|p| p.id.as_str().strip_prefix(&prefix)?.parse::<u64>().ok())
        .map(|n| n + 1)
        .max()
        .unwrap_or(0)
}

impl TriggerStore for TomlTriggerStore {
    fn load(&self) -> Result<Vec<TriggerPhrase>> {
        self.read_file()?
            .phrases
            .into_iter()
            .map(|p| TriggerPhrase::new(p.id, &p.phrase, false))
            .collect()
    }

    fn save(&self, phrases: &[TriggerPhrase]) -> Result<()> {
        let previous = self.read_file()?;
        let stored: Vec<StoredPhrase> = phrases
            .iter()
            .filter(|p| !p.is_default)
            .map(|p| StoredPhrase {
                id: p.id.clone(),
                phrase: p.phrase.clone(),
            })
            .collect();
        let file = StoreFile {
            next_id: previous.next_id.max(next_suffix(&stored)),
            phrases: stored,
        };
        let contents = toml::to_string_pretty(&file).map_err(|e| self.store_error(e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves a truncated store.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user_phrase(n: u64, text: &str) -> TriggerPhrase {
        TriggerPhrase::new(TriggerId::numbered("user", n), text, false).unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = TomlTriggerStore::new(dir.path().join("triggers.toml"));
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.next_id().unwrap().as_str(), "user-0");
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = TomlTriggerStore::new(dir.path().join("nested").join("triggers.toml"));
        let phrases = vec![user_phrase(0, "good morning"), user_phrase(1, "hello assistant")];

        store.save(&phrases).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, phrases);
    }

    #[test]
    fn test_default_phrases_are_not_persisted() {
        let dir = TempDir::new().unwrap();
        let store = TomlTriggerStore::new(dir.path().join("triggers.toml"));
        let default = TriggerPhrase::new(TriggerId::new("default-0"), "hey cue", true).unwrap();

        store.save(&[default, user_phrase(0, "play it")]).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].phrase, "play it");
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let dir = TempDir::new().unwrap();
        let store = TomlTriggerStore::new(dir.path().join("triggers.toml"));

        store
            .save(&[user_phrase(0, "one"), user_phrase(1, "two")])
            .unwrap();
        assert_eq!(store.next_id().unwrap().as_str(), "user-2");

        store.save(&[user_phrase(0, "one")]).unwrap();
        assert_eq!(store.next_id().unwrap().as_str(), "user-2");
    }

    #[test]
    fn test_invalid_file_is_store_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triggers.toml");
        fs::write(&path, "phrases = [ broken").unwrap();

        let err = TomlTriggerStore::new(&path).load().unwrap_err();
        assert!(matches!(err, VoicecueError::TriggerStore { .. }));
    }
}
