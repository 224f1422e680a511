//! voicecue - trigger phrase detection for live speech recognition
//!
//! Reconciles streaming recognizer results into a stable transcript and
//! requests playback once a configured phrase is followed by a real pause.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod driver;
pub mod engine;
pub mod error;
pub mod output;
pub mod playback;
pub mod script;
pub mod triggers;

// Engine
pub use engine::{
    Engine, EngineEvent, MatchStrategy, PlatformMode, RecognitionEvent, RecognitionSegment,
    SessionPhase, SessionState,
};

// Collaborator seams (recognizer → driver → playback)
pub use driver::{DriverInput, SessionDriver};
pub use playback::{AnnouncePlayback, CollectorPlayback, PlaybackSink};
pub use triggers::{TomlTriggerStore, TriggerId, TriggerPhrase, TriggerSet, TriggerStore};

// Error handling
pub use error::{Result, VoicecueError};

// Config
pub use config::{Config, EngineConfig};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
