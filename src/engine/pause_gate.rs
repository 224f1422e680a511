//! Holds a confirmed trigger until the speaker has genuinely paused.

use crate::engine::session::SessionState;
use crate::engine::types::{Diagnostic, EngineEvent};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct PauseGate {
    pause_duration: Duration,
}

impl PauseGate {
    pub fn new(pause_duration: Duration) -> Self {
        Self { pause_duration }
    }

    /// Start (or restart) the pause timer for a confirmed trigger.
    ///
    /// Clears the transcript first so the residual text cannot match again.
    pub fn arm(&self, state: &mut SessionState, now: Instant) -> Vec<EngineEvent> {
        state.clear_transcript();
        let deadline = state.pause_timer.arm(now, self.pause_duration);
        debug!(
            generation = deadline.generation,
            pause_ms = self.pause_duration.as_millis() as u64,
            "Pause timer armed"
        );
        vec![EngineEvent::DisplayCleared]
    }

    /// The speaker is talking again; this was not a real pause.
    pub fn on_speech(&self, state: &mut SessionState) {
        if state.pause_timer.cancel() {
            debug!("Pause timer cancelled by renewed speech");
        }
    }

    /// Fire the pause timer if it expired at `now`.
    pub fn fire_if_due(&self, state: &mut SessionState, now: Instant) -> Option<EngineEvent> {
        state.pause_timer.take_expired(now)?;

        let trigger = state.detected_trigger.clone()?;
        if !state.is_listening || state.is_playing {
            warn!(
                phrase = %trigger.phrase,
                listening = state.is_listening,
                playing = state.is_playing,
                "Pause elapsed but playback not eligible"
            );
            return Some(EngineEvent::Diagnostic(Diagnostic::PlaybackSuppressed {
                trigger,
                listening: state.is_listening,
                playing: state.is_playing,
            }));
        }

        let silence_ms = state
            .last_speech_time
            .map(|t| now.saturating_duration_since(t).as_millis() as u64);
        info!(phrase = %trigger.phrase, ?silence_ms, "Playback requested");

        state.is_playing = true;
        state.clear_detection();
        Some(EngineEvent::PlaybackRequested { trigger })
    }
}
