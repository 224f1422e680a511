//! Infers whether the recognition backend is cumulative or incremental.

use crate::engine::normalize;
use crate::engine::types::PlatformMode;
use tracing::info;

/// Classify a backend from one final result.
///
/// Cumulative iff the incoming text has more words than the current transcript
/// and the current word list is an exact in-order prefix of it.
pub fn classify(current: &str, incoming: &str) -> PlatformMode {
    let current_words = normalize::words(current);
    let incoming_words = normalize::words(incoming);

    if incoming_words.len() > current_words.len()
        && normalize::common_prefix_len(&current_words, &incoming_words) == current_words.len()
    {
        PlatformMode::Cumulative
    } else {
        PlatformMode::Incremental
    }
}

/// Latching per-session detector. Decides once, then never changes.
#[derive(Debug, Default)]
pub struct PlatformModeDetector {
    mode: PlatformMode,
}

impl PlatformModeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PlatformMode {
        self.mode
    }

    /// Observe a final segment against the current transcript.
    ///
    /// Decides only while the mode is still unknown and the current transcript
    /// is non-empty. Returns the mode when this call resolved it.
    pub fn observe_final(&mut self, current: &str, incoming: &str) -> Option<PlatformMode> {
        if self.mode != PlatformMode::Unknown || current.trim().is_empty() {
            return None;
        }
        self.mode = classify(current, incoming);
        info!(mode = ?self.mode, "Platform mode resolved");
        Some(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_cumulative() {
        assert_eq!(
            classify("good morning", "good morning how are you"),
            PlatformMode::Cumulative
        );
    }

    #[test]
    fn test_classify_incremental() {
        assert_eq!(
            classify("good morning", "how are you"),
            PlatformMode::Incremental
        );
    }

    #[test]
    fn test_classify_ignores_case_and_punctuation() {
        assert_eq!(
            classify("Good morning", "good morning, how are you?"),
            PlatformMode::Cumulative
        );
    }

    #[test]
    fn test_equal_length_restatement_is_incremental() {
        // Not strictly longer, so it cannot be a cumulative restatement.
        assert_eq!(
            classify("good morning", "good morning"),
            PlatformMode::Incremental
        );
    }

    #[test]
    fn test_detector_waits_for_non_empty_transcript() {
        let mut detector = PlatformModeDetector::new();
        assert_eq!(detector.observe_final("", "hello"), None);
        assert_eq!(detector.mode(), PlatformMode::Unknown);
    }

    #[test]
    fn test_detector_latches() {
        let mut detector = PlatformModeDetector::new();
        assert_eq!(
            detector.observe_final("good morning", "how are you"),
            Some(PlatformMode::Incremental)
        );
        // A later cumulative-looking result does not flip the decision.
        assert_eq!(
            detector.observe_final("how are you", "how are you doing today"),
            None
        );
        assert_eq!(detector.mode(), PlatformMode::Incremental);
    }
}
