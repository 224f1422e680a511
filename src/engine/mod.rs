//! Reconciliation and trigger detection engine.
//!
//! ```text
//! ┌────────┐    ┌──────────┐    ┌───────────┐    ┌─────────────┐
//! │ Ingest │───▶│ Platform │───▶│ Reconcile │───▶│ PauseBuffer │───▶ TranscriptUpdated
//! └────────┘    │ Detector │    └───────────┘    └─────────────┘
//!               └──────────┘          │
//!                                     ▼ (final result)
//!                              ┌────────────┐    ┌───────────┐
//!                              │  Trigger   │───▶│ PauseGate │───▶ PlaybackRequested
//!                              │  Matcher   │    └───────────┘
//!                              └────────────┘
//! ```

pub mod ingest;
pub mod matcher;
pub mod normalize;
pub mod orchestrator;
pub mod pause_buffer;
pub mod pause_gate;
pub mod platform;
pub mod reconcile;
pub mod session;
pub mod timer;
pub mod types;

pub use matcher::{ExactSubstring, MatchStrategy, OrderedWords, TriggerMatcher};
pub use orchestrator::Engine;
pub use session::SessionState;
pub use timer::{TimerKind, TimerSlot};
pub use types::{
    Diagnostic, EngineEvent, MatchTier, PlatformMode, RecognitionEvent, RecognitionSegment,
    SessionPhase,
};
