//! Tiered trigger phrase matching with a verification guard.
//!
//! Priority tiers search only the newest final text so a phrase still sitting
//! in old accumulated text does not fire again. The fallback tier searches a
//! bounded window of recent text to catch a phrase split across two final
//! results. Every candidate must pass [`verify`] before it counts.

use crate::engine::normalize;
use crate::engine::types::{Diagnostic, MatchTier};
use crate::triggers::{TriggerPhrase, TriggerSet};
use tracing::warn;

/// One way of finding a phrase in a text.
pub trait MatchStrategy: Send + 'static {
    /// Returns the matched span of `text` when `phrase` is found.
    fn find(&self, phrase: &TriggerPhrase, text: &str) -> Option<String>;

    /// Name for logging/diagnostics.
    fn name(&self) -> &'static str;
}

/// The phrase appears verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSubstring;

impl MatchStrategy for ExactSubstring {
    fn find(&self, phrase: &TriggerPhrase, text: &str) -> Option<String> {
        let start = text.find(phrase.phrase.as_str())?;
        Some(text[start..start + phrase.phrase.len()].to_string())
    }

    fn name(&self) -> &'static str {
        "exact-substring"
    }
}

/// All phrase words appear in order, not necessarily adjacent.
///
/// Matched greedily left to right without backtracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedWords;

impl MatchStrategy for OrderedWords {
    fn find(&self, phrase: &TriggerPhrase, text: &str) -> Option<String> {
        let wanted = normalize::words(&phrase.phrase);
        if wanted.is_empty() {
            return None;
        }

        let mut next = 0;
        let mut span: Option<(usize, usize)> = None;
        for token in normalize::tokenize(text) {
            if token.key != wanted[next] {
                continue;
            }
            let end = token.start + token.raw.len();
            span = Some(match span {
                Some((start, _)) => (start, end),
                None => (token.start, end),
            });
            next += 1;
            if next == wanted.len() {
                return span.map(|(start, end)| text[start..end].to_string());
            }
        }
        None
    }

    fn name(&self) -> &'static str {
        "ordered-words"
    }
}

/// The two texts a match is searched in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTexts {
    /// Lowercased newest final text (pending buffer plus this event's delta).
    pub combined_recent: String,
    /// Last `recency_window_chars` of lowercased stable + recent text.
    pub recency_window: String,
}

impl SearchTexts {
    pub fn new(stable: &str, pending: &str, recency_window_chars: usize) -> Self {
        let combined_recent = pending.trim().to_lowercase();
        let everything = normalize::join_spaced(&stable.to_lowercase(), &combined_recent);
        let recency_window =
            normalize::tail_chars(&everything, recency_window_chars).to_string();
        Self {
            combined_recent,
            recency_window,
        }
    }
}

/// Confirm the literal phrase text is present in one of the search texts.
///
/// A strategy may report a looser match (ordered words with gaps or
/// punctuation in between); only a literal occurrence counts.
pub fn verify(phrase: &TriggerPhrase, texts: &SearchTexts) -> bool {
    let literal = phrase.phrase.as_str();
    texts.combined_recent.contains(literal) || texts.recency_window.contains(literal)
}

/// An accepted match.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerMatch {
    pub trigger: TriggerPhrase,
    pub tier: MatchTier,
    pub matched_text: String,
}

/// Outcome of one search: at most one match plus any guard rejections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub found: Option<TriggerMatch>,
    pub rejected: Vec<Diagnostic>,
}

pub struct TriggerMatcher {
    priority: Vec<Box<dyn MatchStrategy>>,
    fallback: Vec<Box<dyn MatchStrategy>>,
}

impl std::fmt::Debug for TriggerMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |tiers: &[Box<dyn MatchStrategy>]| -> Vec<&'static str> {
            tiers.iter().map(|s| s.name()).collect()
        };
        f.debug_struct("TriggerMatcher")
            .field("priority", &names(&self.priority))
            .field("fallback", &names(&self.fallback))
            .finish()
    }
}

impl Default for TriggerMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerMatcher {
    /// Exact substring then ordered words on the recent text; exact substring
    /// on the recency window as fallback.
    pub fn new() -> Self {
        Self::with_strategies(
            vec![Box::new(ExactSubstring), Box::new(OrderedWords)],
            vec![Box::new(ExactSubstring)],
        )
    }

    pub fn with_strategies(
        priority: Vec<Box<dyn MatchStrategy>>,
        fallback: Vec<Box<dyn MatchStrategy>>,
    ) -> Self {
        Self { priority, fallback }
    }

    /// Search `triggers` in configured order; the first accepted match wins.
    ///
    /// Priority tiers are tried for every phrase before any fallback.
    pub fn find(&self, triggers: &TriggerSet, texts: &SearchTexts) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();

        for trigger in triggers.iter() {
            if let Some(found) = self.try_tiers(
                trigger,
                &self.priority,
                &texts.combined_recent,
                MatchTier::Priority,
                texts,
                &mut outcome.rejected,
            ) {
                outcome.found = Some(found);
                return outcome;
            }
        }

        for trigger in triggers.iter() {
            if let Some(found) = self.try_tiers(
                trigger,
                &self.fallback,
                &texts.recency_window,
                MatchTier::Fallback,
                texts,
                &mut outcome.rejected,
            ) {
                outcome.found = Some(found);
                return outcome;
            }
        }

        outcome
    }

    fn try_tiers(
        &self,
        trigger: &TriggerPhrase,
        strategies: &[Box<dyn MatchStrategy>],
        text: &str,
        tier: MatchTier,
        texts: &SearchTexts,
        rejected: &mut Vec<Diagnostic>,
    ) -> Option<TriggerMatch> {
        for strategy in strategies {
            let Some(matched_text) = strategy.find(trigger, text) else {
                continue;
            };
            if verify(trigger, texts) {
                return Some(TriggerMatch {
                    trigger: trigger.clone(),
                    tier,
                    matched_text,
                });
            }
            warn!(
                phrase = %trigger.phrase,
                strategy = strategy.name(),
                ?tier,
                "Match failed verification, discarding"
            );
            rejected.push(Diagnostic::GuardRejected {
                phrase: trigger.phrase.clone(),
                tier,
            });
        }
        None
    }
}
