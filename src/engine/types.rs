//! Data types flowing into and out of the engine.

use crate::triggers::TriggerPhrase;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One segment of a recognition result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionSegment {
    pub text: String,
    #[serde(default)]
    pub is_final: bool,
}

impl RecognitionSegment {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// One event pushed by the external recognizer.
///
/// `results[result_index..]` is the unprocessed range. Indices are assumed
/// non-decreasing across events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionEvent {
    #[serde(default)]
    pub result_index: usize,
    pub results: Vec<RecognitionSegment>,
}

impl RecognitionEvent {
    pub fn new(result_index: usize, results: Vec<RecognitionSegment>) -> Self {
        Self {
            result_index,
            results,
        }
    }
}

/// Whether the backend restates the whole utterance on every final result
/// or only delivers newly heard text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformMode {
    #[default]
    Unknown,
    Cumulative,
    Incremental,
}

/// Which matching tier produced a trigger match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Found in the newest final chunk.
    Priority,
    /// Found only in the recency window of older text.
    Fallback,
}

/// Session state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Listening,
    /// A trigger was confirmed and the pause timer is running.
    AwaitingPlayback,
    /// Playback was requested and the collaborator has not signalled done.
    Playing,
}

/// Diagnostic-only signals. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A matching tier reported a match the verification guard could not
    /// confirm in the searched text.
    GuardRejected { phrase: String, tier: MatchTier },
    /// The pause timer fired but playback was not eligible.
    PlaybackSuppressed {
        trigger: TriggerPhrase,
        listening: bool,
        playing: bool,
    },
}

/// Events emitted by the engine for playback, logging and UI collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A settled burst of final text was appended to the stable transcript.
    TranscriptUpdated { text: String },
    /// The newest interim text, reduced to what is not yet stable.
    InterimTranscript { text: String },
    /// A trigger phrase matched.
    TriggerDetected {
        trigger: TriggerPhrase,
        matched_text: String,
        tier: MatchTier,
        at: Instant,
    },
    /// Any displayed transcript should be cleared.
    DisplayCleared,
    /// A confirmed trigger survived the pause; play its response.
    PlaybackRequested { trigger: TriggerPhrase },
    Diagnostic(Diagnostic),
}

impl EngineEvent {
    /// Short event name for logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::TranscriptUpdated { .. } => "transcript_updated",
            EngineEvent::InterimTranscript { .. } => "interim_transcript",
            EngineEvent::TriggerDetected { .. } => "trigger_detected",
            EngineEvent::DisplayCleared => "display_cleared",
            EngineEvent::PlaybackRequested { .. } => "playback_requested",
            EngineEvent::Diagnostic(_) => "diagnostic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes_with_defaults() {
        let json = r#"{"results":[{"text":"hello"},{"text":"world","is_final":true}]}"#;
        let event: RecognitionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.result_index, 0);
        assert!(!event.results[0].is_final);
        assert!(event.results[1].is_final);
    }

    #[test]
    fn test_platform_mode_defaults_to_unknown() {
        assert_eq!(PlatformMode::default(), PlatformMode::Unknown);
    }

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EngineEvent::DisplayCleared.kind(), "display_cleared");
        assert_eq!(
            EngineEvent::TranscriptUpdated {
                text: "x".to_string()
            }
            .kind(),
            "transcript_updated"
        );
    }
}
