use crate::defaults;
use crate::error::{Result, VoicecueError};
use crate::triggers::{TomlTriggerStore, TriggerId, TriggerPhrase, TriggerSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSettings,
    pub triggers: TriggerSettings,
    pub playback: PlaybackSettings,
}

/// Timing and window settings, as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub pause_duration_ms: u64,
    pub settle_delay_ms: u64,
    pub recency_window_chars: usize,
}

/// Trigger phrase sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct TriggerSettings {
    /// Built-in phrases, active before any stored phrase.
    pub defaults: Vec<String>,
    /// Trigger store file; `None` uses the XDG default.
    pub store: Option<PathBuf>,
}

/// Terminal playback settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackSettings {
    pub simulated_duration_ms: u64,
}

/// Engine-facing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Quiet period after a confirmed trigger before playback is requested.
    pub pause_duration: Duration,
    /// Quiet period that coalesces bursts of final results.
    pub settle_delay: Duration,
    /// Size of the fallback search window, in characters.
    pub recency_window_chars: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            pause_duration_ms: defaults::PAUSE_DURATION_MS,
            settle_delay_ms: defaults::SETTLE_DELAY_MS,
            recency_window_chars: defaults::RECENCY_WINDOW_CHARS,
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            simulated_duration_ms: defaults::SIMULATED_PLAYBACK_MS,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineSettings::default().to_engine_config()
    }
}

impl EngineSettings {
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            pause_duration: Duration::from_millis(self.pause_duration_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            recency_window_chars: self.recency_window_chars,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VoicecueError::ConfigFileNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(VoicecueError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("engine.pause_duration_ms", self.engine.pause_duration_ms),
            ("engine.settle_delay_ms", self.engine.settle_delay_ms),
            (
                "engine.recency_window_chars",
                self.engine.recency_window_chars as u64,
            ),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(VoicecueError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }
        for phrase in &self.triggers.defaults {
            if phrase.trim().is_empty() {
                return Err(VoicecueError::ConfigInvalidValue {
                    key: "triggers.defaults".to_string(),
                    message: "phrases must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOICECUE_PAUSE_MS → engine.pause_duration_ms
    /// - VOICECUE_SETTLE_MS → engine.settle_delay_ms
    /// - VOICECUE_RECENCY_CHARS → engine.recency_window_chars
    ///
    /// Empty, unparsable or zero values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = env_positive("VOICECUE_PAUSE_MS") {
            self.engine.pause_duration_ms = ms;
        }
        if let Some(ms) = env_positive("VOICECUE_SETTLE_MS") {
            self.engine.settle_delay_ms = ms;
        }
        if let Some(chars) = env_positive("VOICECUE_RECENCY_CHARS") {
            self.engine.recency_window_chars = chars as usize;
        }
        self
    }

    pub fn engine_config(&self) -> EngineConfig {
        self.engine.to_engine_config()
    }

    /// Where user trigger phrases are persisted.
    pub fn trigger_store_path(&self) -> PathBuf {
        self.triggers
            .store
            .clone()
            .or_else(TomlTriggerStore::default_path)
            .unwrap_or_else(|| PathBuf::from("triggers.toml"))
    }

    /// Active trigger set: configured defaults in order, then `stored`.
    pub fn trigger_set(&self, stored: Vec<TriggerPhrase>) -> Result<TriggerSet> {
        let mut set = TriggerSet::new();
        for (n, phrase) in self.triggers.defaults.iter().enumerate() {
            let id = TriggerId::numbered(defaults::DEFAULT_TRIGGER_ID_PREFIX, n as u64);
            set.add(TriggerPhrase::new(id, phrase, true)?)?;
        }
        for phrase in stored {
            set.add(phrase)?;
        }
        Ok(set)
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voicecue/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voicecue")
            .join("config.toml")
    }
}

fn env_positive(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}
