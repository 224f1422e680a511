//! Per-session mutable state threaded through every engine component.

use crate::engine::ingest::FinalSegment;
use crate::engine::normalize;
use crate::engine::reconcile::TranscriptReconciler;
use crate::engine::timer::{TimerKind, TimerSlot};
use crate::engine::types::{PlatformMode, SessionPhase};
use crate::triggers::TriggerPhrase;
use std::collections::BTreeMap;
use std::time::Instant;

/// Everything one listening session knows.
///
/// Created on start, reset on trigger confirmation or explicit clear,
/// replaced wholesale on stop. Owned by exactly one engine.
#[derive(Debug)]
pub struct SessionState {
    /// Committed transcript. Grows only by committed deltas.
    pub(crate) stable_transcript: String,
    /// Final deltas waiting for the settle timer.
    pub(crate) pending_final_buffer: String,
    /// Holds the latched platform mode.
    pub(crate) reconciler: TranscriptReconciler,
    pub(crate) is_listening: bool,
    pub(crate) is_playing: bool,
    pub(crate) trigger_detected_in_session: bool,
    pub(crate) detected_trigger: Option<TriggerPhrase>,
    pub(crate) last_speech_time: Option<Instant>,
    pub(crate) settle_timer: TimerSlot,
    pub(crate) pause_timer: TimerSlot,
    /// Final segments already consumed, by absolute result index.
    delivered_finals: BTreeMap<usize, String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            stable_transcript: String::new(),
            pending_final_buffer: String::new(),
            reconciler: TranscriptReconciler::new(),
            is_listening: false,
            is_playing: false,
            trigger_detected_in_session: false,
            detected_trigger: None,
            last_speech_time: None,
            settle_timer: TimerSlot::new(TimerKind::Settle),
            pause_timer: TimerSlot::new(TimerKind::Pause),
            delivered_finals: BTreeMap::new(),
        }
    }

    pub fn stable_transcript(&self) -> &str {
        &self.stable_transcript
    }

    pub fn pending_final_buffer(&self) -> &str {
        &self.pending_final_buffer
    }

    pub fn platform_mode(&self) -> PlatformMode {
        self.reconciler.mode()
    }

    pub fn is_listening(&self) -> bool {
        self.is_listening
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn trigger_detected_in_session(&self) -> bool {
        self.trigger_detected_in_session
    }

    pub fn detected_trigger(&self) -> Option<&TriggerPhrase> {
        self.detected_trigger.as_ref()
    }

    pub fn last_speech_time(&self) -> Option<Instant> {
        self.last_speech_time
    }

    pub fn settle_timer_armed(&self) -> bool {
        self.settle_timer.is_armed()
    }

    pub fn pause_timer_armed(&self) -> bool {
        self.pause_timer.is_armed()
    }

    /// Derived session phase.
    pub fn phase(&self) -> SessionPhase {
        if !self.is_listening {
            SessionPhase::Idle
        } else if self.is_playing {
            SessionPhase::Playing
        } else if self.pause_timer.is_armed() {
            SessionPhase::AwaitingPlayback
        } else {
            SessionPhase::Listening
        }
    }

    /// Everything heard so far: stable transcript then uncommitted finals.
    pub fn reference_text(&self) -> String {
        normalize::join_spaced(&self.stable_transcript, &self.pending_final_buffer)
    }

    /// Earliest live timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.settle_timer.deadline(), self.pause_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// True when this exact final segment was already consumed.
    pub(crate) fn is_redelivery(&self, segment: &FinalSegment<'_>) -> bool {
        self.delivered_finals
            .get(&segment.index)
            .is_some_and(|text| text == segment.text)
    }

    pub(crate) fn mark_delivered(&mut self, segment: &FinalSegment<'_>) {
        self.delivered_finals
            .insert(segment.index, segment.text.to_string());
    }

    /// Forget ledger entries below `result_index`; indices never go backwards.
    pub(crate) fn prune_delivered(&mut self, result_index: usize) {
        self.delivered_finals = self.delivered_finals.split_off(&result_index);
    }

    pub(crate) fn clear_detection(&mut self) {
        self.trigger_detected_in_session = false;
        self.detected_trigger = None;
    }

    /// Drop the stable transcript and the pending buffer, with its timer.
    pub(crate) fn clear_transcript(&mut self) {
        self.stable_transcript.clear();
        self.pending_final_buffer.clear();
        self.settle_timer.cancel();
    }
}
