//! Coalesces bursts of final results into one committed transcript update.
//!
//! Backends often emit several final results back to back. Committing each
//! one separately makes the display flicker and can commit text the backend
//! is about to extend, so finals sit in the pending buffer until nothing has
//! arrived for the settle delay.

use crate::engine::session::SessionState;
use crate::engine::types::EngineEvent;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PauseBuffer {
    settle_delay: Duration,
}

impl PauseBuffer {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    /// Append a non-empty final delta to the pending buffer.
    pub fn push_delta(&self, state: &mut SessionState, delta: &str, now: Instant) {
        let delta = delta.trim();
        if delta.is_empty() {
            return;
        }
        state.pending_final_buffer.push_str(delta);
        state.pending_final_buffer.push(' ');
        state.last_speech_time = Some(now);
    }

    /// React to the activity flags of one event.
    ///
    /// Interim speech holds the commit back; otherwise a non-empty buffer
    /// (re)starts the settle timer.
    pub fn on_activity(&self, state: &mut SessionState, has_interim: bool, now: Instant) {
        if has_interim {
            if state.settle_timer.cancel() {
                debug!("Settle timer cancelled by interim speech");
            }
        } else if !state.pending_final_buffer.trim().is_empty() {
            state.settle_timer.arm(now, self.settle_delay);
        }
    }

    /// Commit the pending buffer if the settle timer expired at `now`.
    pub fn commit_if_due(&self, state: &mut SessionState, now: Instant) -> Option<EngineEvent> {
        state.settle_timer.take_expired(now)?;
        self.commit(state)
    }

    /// Move the pending buffer into the stable transcript.
    pub fn commit(&self, state: &mut SessionState) -> Option<EngineEvent> {
        let committed = state.pending_final_buffer.trim().to_string();
        state.pending_final_buffer.clear();
        if committed.is_empty() {
            return None;
        }
        if !state.stable_transcript.is_empty() {
            state.stable_transcript.push(' ');
        }
        state.stable_transcript.push_str(&committed);
        debug!(text = %committed, "Transcript committed");
        Some(EngineEvent::TranscriptUpdated { text: committed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_commits_once() {
        let t0 = Instant::now();
        let buffer = PauseBuffer::new(ms(300));
        let mut state = SessionState::new();

        buffer.push_delta(&mut state, "hello", t0);
        buffer.on_activity(&mut state, false, t0);
        buffer.push_delta(&mut state, "world", t0 + ms(100));
        buffer.on_activity(&mut state, false, t0 + ms(100));

        // The first timer was superseded by the second final.
        assert!(buffer.commit_if_due(&mut state, t0 + ms(300)).is_none());
        let event = buffer.commit_if_due(&mut state, t0 + ms(400));
        assert_eq!(
            event,
            Some(EngineEvent::TranscriptUpdated {
                text: "hello world".to_string()
            })
        );
        assert_eq!(state.stable_transcript(), "hello world");
        assert!(state.pending_final_buffer().is_empty());
    }

    #[test]
    fn test_interim_holds_commit() {
        let t0 = Instant::now();
        let buffer = PauseBuffer::new(ms(300));
        let mut state = SessionState::new();

        buffer.push_delta(&mut state, "hello", t0);
        buffer.on_activity(&mut state, false, t0);
        buffer.on_activity(&mut state, true, t0 + ms(200));

        assert!(!state.settle_timer_armed());
        assert!(buffer.commit_if_due(&mut state, t0 + ms(1000)).is_none());
        assert_eq!(state.pending_final_buffer().trim(), "hello");
    }

    #[test]
    fn test_commit_appends_with_space() {
        let t0 = Instant::now();
        let buffer = PauseBuffer::new(ms(300));
        let mut state = SessionState::new();
        state.stable_transcript = "good morning".to_string();

        buffer.push_delta(&mut state, "how are you", t0);
        buffer.on_activity(&mut state, false, t0);
        buffer.commit_if_due(&mut state, t0 + ms(300));

        assert_eq!(state.stable_transcript(), "good morning how are you");
    }

    #[test]
    fn test_empty_delta_is_ignored() {
        let t0 = Instant::now();
        let buffer = PauseBuffer::new(ms(300));
        let mut state = SessionState::new();

        buffer.push_delta(&mut state, "   ", t0);
        buffer.on_activity(&mut state, false, t0);

        assert!(state.pending_final_buffer().is_empty());
        assert!(!state.settle_timer_armed());
        assert_eq!(state.last_speech_time(), None);
    }
}
