//! The engine: one session's reconciliation and trigger detection.
//!
//! ```text
//! RecognitionEvent ─▶ ingest ─▶ reconcile ─▶ PauseBuffer ─(settle)─▶ TranscriptUpdated
//!                                   │
//!                                   └─(has final)─▶ TriggerMatcher ─▶ PauseGate ─(pause)─▶ PlaybackRequested
//! ```
//!
//! Every method runs to completion against the owned [`SessionState`] and
//! returns the events it produced. Time is passed in, never read, so a
//! simulated clock drives the engine exactly like a real one.

use crate::config::EngineConfig;
use crate::engine::ingest::{self, FinalSegment};
use crate::engine::matcher::{SearchTexts, TriggerMatcher};
use crate::engine::pause_buffer::PauseBuffer;
use crate::engine::pause_gate::PauseGate;
use crate::engine::session::SessionState;
use crate::engine::timer::TimerKind;
use crate::engine::types::{EngineEvent, MatchTier, PlatformMode, RecognitionEvent, SessionPhase};
use crate::error::Result;
use crate::triggers::{TriggerId, TriggerPhrase, TriggerSet};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    triggers: TriggerSet,
    matcher: TriggerMatcher,
    buffer: PauseBuffer,
    gate: PauseGate,
    state: SessionState,
}

impl Engine {
    pub fn new(config: EngineConfig, triggers: TriggerSet) -> Self {
        Self::with_matcher(config, triggers, TriggerMatcher::new())
    }

    pub fn with_matcher(
        config: EngineConfig,
        triggers: TriggerSet,
        matcher: TriggerMatcher,
    ) -> Self {
        Self {
            buffer: PauseBuffer::new(config.settle_delay),
            gate: PauseGate::new(config.pause_duration),
            config,
            triggers,
            matcher,
            state: SessionState::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn platform_mode(&self) -> PlatformMode {
        self.state.platform_mode()
    }

    pub fn triggers(&self) -> &TriggerSet {
        &self.triggers
    }

    /// Takes effect on the next recognition event.
    pub fn add_trigger(&mut self, trigger: TriggerPhrase) -> Result<()> {
        self.triggers.add(trigger)
    }

    pub fn remove_trigger(&mut self, id: &TriggerId) -> Result<TriggerPhrase> {
        self.triggers.remove(id)
    }

    /// Earliest time [`Engine::poll_timers`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.next_deadline()
    }

    /// Begin a fresh session. No-op while already listening.
    pub fn start(&mut self) {
        if self.state.is_listening {
            debug!("start ignored: already listening");
            return;
        }
        self.state = SessionState::new();
        self.state.is_listening = true;
        info!("Session started");
    }

    /// End the session: both timers and the pending buffer are discarded.
    pub fn stop(&mut self) {
        if !self.state.is_listening {
            return;
        }
        self.state.settle_timer.cancel();
        self.state.pause_timer.cancel();
        self.state = SessionState::new();
        info!("Session stopped");
    }

    /// Forget the transcript and any pending detection.
    pub fn clear(&mut self) -> Vec<EngineEvent> {
        self.state.clear_transcript();
        self.state.pause_timer.cancel();
        self.state.clear_detection();
        debug!("Transcript cleared");
        vec![EngineEvent::DisplayCleared]
    }

    /// The playback collaborator finished.
    pub fn playback_finished(&mut self) {
        if self.state.is_playing {
            self.state.is_playing = false;
            info!("Playback finished");
        }
    }

    /// Process one recognition event.
    pub fn handle_event(&mut self, event: &RecognitionEvent, now: Instant) -> Vec<EngineEvent> {
        if !self.state.is_listening {
            debug!("Recognition event ignored: not listening");
            return Vec::new();
        }

        let ingested = ingest::ingest(event);
        self.state.prune_delivered(event.result_index);
        let finals: Vec<FinalSegment<'_>> = ingested
            .finals
            .iter()
            .filter(|segment| !self.state.is_redelivery(segment))
            .copied()
            .collect();
        let has_final = !finals.is_empty();
        let has_interim = ingested.has_interim();
        if !has_final && !has_interim {
            return Vec::new();
        }

        let mut events = Vec::new();

        let reference = self.state.reference_text();
        let reconciled = self.state.reconciler.reconcile_finals(&reference, &finals);
        for segment in &finals {
            self.state.mark_delivered(segment);
        }
        self.buffer.push_delta(&mut self.state, &reconciled.delta, now);

        if let Some(interim) = ingested.interim {
            self.state.last_speech_time = Some(now);
            let reference = self.state.reference_text();
            let text = self.state.reconciler.interim_delta(&reference, interim);
            if !text.is_empty() {
                events.push(EngineEvent::InterimTranscript {
                    text: text.to_string(),
                });
            }
            self.gate.on_speech(&mut self.state);
        }
        self.buffer.on_activity(&mut self.state, has_interim, now);

        if has_final {
            self.detect_trigger(has_interim, now, &mut events);
        }
        events
    }

    fn detect_trigger(&mut self, has_interim: bool, now: Instant, events: &mut Vec<EngineEvent>) {
        let texts = SearchTexts::new(
            &self.state.stable_transcript,
            &self.state.pending_final_buffer,
            self.config.recency_window_chars,
        );
        let outcome = self.matcher.find(&self.triggers, &texts);
        events.extend(outcome.rejected.into_iter().map(EngineEvent::Diagnostic));

        let Some(found) = outcome.found else {
            if self.state.trigger_detected_in_session {
                debug!("No trigger in latest text, clearing detection");
            }
            self.state.clear_detection();
            // With the detection gone there is nothing left to play.
            self.gate.on_speech(&mut self.state);
            return;
        };

        if found.tier == MatchTier::Fallback && self.state.trigger_detected_in_session {
            debug!(phrase = %found.trigger.phrase, "Fallback match already reported");
            return;
        }

        info!(
            phrase = %found.trigger.phrase,
            tier = ?found.tier,
            matched = %found.matched_text,
            "Trigger detected"
        );
        self.state.trigger_detected_in_session = true;
        self.state.detected_trigger = Some(found.trigger.clone());
        events.push(EngineEvent::TriggerDetected {
            trigger: found.trigger,
            matched_text: found.matched_text,
            tier: found.tier,
            at: now,
        });

        if !has_interim {
            events.extend(self.gate.arm(&mut self.state, now));
        }
    }

    /// Run every timer that has expired at `now`, earliest first.
    pub fn poll_timers(&mut self, now: Instant) -> Vec<EngineEvent> {
        if !self.state.is_listening {
            if self.state.next_deadline().is_some() {
                warn!("Timer live on a stopped session, discarding");
                self.state.settle_timer.cancel();
                self.state.pause_timer.cancel();
            }
            return Vec::new();
        }

        let mut order = [
            (TimerKind::Settle, self.state.settle_timer.deadline()),
            (TimerKind::Pause, self.state.pause_timer.deadline()),
        ];
        order.sort_by_key(|(_, due)| *due);

        let mut events = Vec::new();
        for (kind, _) in order {
            let event = match kind {
                TimerKind::Settle => self.buffer.commit_if_due(&mut self.state, now),
                TimerKind::Pause => self.gate.fire_if_due(&mut self.state, now),
            };
            events.extend(event);
        }
        events
    }
}
