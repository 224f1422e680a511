//! Reduces raw recognition segments to the text that is actually new.

use crate::engine::ingest::FinalSegment;
use crate::engine::normalize;
use crate::engine::platform::PlatformModeDetector;
use crate::engine::types::PlatformMode;
use tracing::debug;

/// New-only portion of `incoming` relative to `current`, under `mode`.
///
/// The returned slice borrows `incoming`, so casing and punctuation survive.
pub fn delta<'a>(mode: PlatformMode, current: &str, incoming: &'a str) -> &'a str {
    let current = current.trim();
    let incoming = incoming.trim();
    if current.is_empty() {
        return incoming;
    }

    match mode {
        PlatformMode::Cumulative => {
            let current_words = normalize::words(current);
            let tokens = normalize::tokenize(incoming);
            let incoming_keys: Vec<&str> = tokens.iter().map(|t| t.key.as_str()).collect();
            let k = normalize::common_prefix_len(&current_words, &incoming_keys);
            match tokens.get(k) {
                Some(token) => incoming[token.start..].trim(),
                None => "",
            }
        }
        PlatformMode::Incremental | PlatformMode::Unknown => {
            match normalize::strip_prefix_ignore_case(incoming, current) {
                Some(rest) => rest.trim(),
                None => incoming,
            }
        }
    }
}

/// Result of reconciling all final segments of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledFinals {
    /// Per-segment deltas joined by single spaces, in order.
    pub delta: String,
    /// Set when this event resolved the platform mode.
    pub resolved_mode: Option<PlatformMode>,
}

/// Owns the session's platform detector and applies it to every segment.
#[derive(Debug, Default)]
pub struct TranscriptReconciler {
    detector: PlatformModeDetector,
}

impl TranscriptReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PlatformMode {
        self.detector.mode()
    }

    /// Reconcile each final segment in order against `reference`.
    ///
    /// Each segment is compared with the reference extended by the deltas of
    /// the segments before it in the same event.
    pub fn reconcile_finals(
        &mut self,
        reference: &str,
        finals: &[FinalSegment<'_>],
    ) -> ReconciledFinals {
        let mut out = ReconciledFinals::default();
        let mut working = reference.trim().to_string();

        for segment in finals {
            if let Some(mode) = self.detector.observe_final(&working, segment.text) {
                out.resolved_mode = Some(mode);
            }
            let piece = delta(self.detector.mode(), &working, segment.text);
            debug!(index = segment.index, raw = segment.text, delta = piece, "Final segment");
            if piece.is_empty() {
                continue;
            }
            out.delta = normalize::join_spaced(&out.delta, piece);
            working = normalize::join_spaced(&working, piece);
        }
        out
    }

    /// Delta of an interim segment. Never resolves the platform mode.
    pub fn interim_delta<'a>(&self, reference: &str, interim: &'a str) -> &'a str {
        delta(self.detector.mode(), reference, interim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(index: usize, text: &str) -> FinalSegment<'_> {
        FinalSegment { index, text }
    }

    #[test]
    fn test_cumulative_delta_after_common_prefix() {
        assert_eq!(
            delta(
                PlatformMode::Cumulative,
                "good morning",
                "Good morning, how are you"
            ),
            "how are you"
        );
    }

    #[test]
    fn test_cumulative_delta_preserves_casing() {
        assert_eq!(
            delta(PlatformMode::Cumulative, "hello", "hello World Again"),
            "World Again"
        );
    }

    #[test]
    fn test_cumulative_restatement_is_empty() {
        assert_eq!(
            delta(PlatformMode::Cumulative, "good morning", "good morning"),
            ""
        );
    }

    #[test]
    fn test_cumulative_divergence_keeps_tail() {
        // Only the first word agrees; everything after it is new.
        assert_eq!(
            delta(PlatformMode::Cumulative, "good morning", "good evening all"),
            "evening all"
        );
    }

    #[test]
    fn test_incremental_verbatim() {
        assert_eq!(
            delta(PlatformMode::Incremental, "good morning", "how are you"),
            "how are you"
        );
    }

    #[test]
    fn test_incremental_strips_case_insensitive_prefix() {
        assert_eq!(
            delta(
                PlatformMode::Incremental,
                "good morning",
                "Good Morning everyone"
            ),
            "everyone"
        );
    }

    #[test]
    fn test_empty_current_is_verbatim() {
        assert_eq!(delta(PlatformMode::Cumulative, "", " Hello "), "Hello");
        assert_eq!(delta(PlatformMode::Unknown, "  ", "Hello"), "Hello");
    }

    #[test]
    fn test_reconcile_resolves_cumulative() {
        let mut reconciler = TranscriptReconciler::new();
        let out = reconciler.reconcile_finals(
            "good morning",
            &[seg(0, "good morning how are you")],
        );
        assert_eq!(out.resolved_mode, Some(PlatformMode::Cumulative));
        assert_eq!(out.delta, "how are you");
        assert_eq!(reconciler.mode(), PlatformMode::Cumulative);
    }

    #[test]
    fn test_reconcile_resolves_incremental() {
        let mut reconciler = TranscriptReconciler::new();
        let out = reconciler.reconcile_finals("good morning", &[seg(0, "how are you")]);
        assert_eq!(out.resolved_mode, Some(PlatformMode::Incremental));
        assert_eq!(out.delta, "how are you");
    }

    #[test]
    fn test_reconcile_joins_multiple_segments() {
        let mut reconciler = TranscriptReconciler::new();
        let out = reconciler.reconcile_finals("", &[seg(0, "hello"), seg(1, "world")]);
        assert_eq!(out.delta, "hello world");
        // Second segment saw "hello" as the reference and latched incremental.
        assert_eq!(out.resolved_mode, Some(PlatformMode::Incremental));
    }

    #[test]
    fn test_first_final_without_transcript_does_not_resolve() {
        let mut reconciler = TranscriptReconciler::new();
        let out = reconciler.reconcile_finals("", &[seg(0, "hello")]);
        assert_eq!(out.resolved_mode, None);
        assert_eq!(reconciler.mode(), PlatformMode::Unknown);
    }

    #[test]
    fn test_interim_delta_uses_latched_mode() {
        let mut reconciler = TranscriptReconciler::new();
        reconciler.reconcile_finals("good morning", &[seg(0, "good morning how")]);
        assert_eq!(
            reconciler.interim_delta("good morning how", "good morning how are"),
            "are"
        );
    }
}
