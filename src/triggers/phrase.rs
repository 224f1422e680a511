//! Trigger phrases and the ordered set the engine searches.

use crate::error::{Result, VoicecueError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, unique identifier of a trigger phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerId(String);

impl TriggerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds `<prefix>-<n>`, the id scheme used for default and stored phrases.
    pub fn numbered(prefix: &str, n: u64) -> Self {
        Self(format!("{prefix}-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured phrase whose detection in speech should request playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPhrase {
    pub id: TriggerId,
    /// Lowercase, trimmed, single-spaced.
    pub phrase: String,
    #[serde(default)]
    pub is_default: bool,
}

impl TriggerPhrase {
    /// Creates a trigger phrase, normalizing the text.
    ///
    /// Returns [`VoicecueError::EmptyTriggerPhrase`] when nothing but
    /// whitespace remains.
    pub fn new(id: TriggerId, phrase: &str, is_default: bool) -> Result<Self> {
        let phrase = normalize_phrase(phrase);
        if phrase.is_empty() {
            return Err(VoicecueError::EmptyTriggerPhrase);
        }
        Ok(Self {
            id,
            phrase,
            is_default,
        })
    }
}

/// Lowercase, trim and collapse internal whitespace.
pub fn normalize_phrase(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered collection of active trigger phrases.
///
/// Order is significant: when two phrases overlap (one is a substring of the
/// other), the one configured first wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerSet {
    phrases: Vec<TriggerPhrase>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from phrases in order, rejecting duplicates.
    pub fn from_phrases(phrases: impl IntoIterator<Item = TriggerPhrase>) -> Result<Self> {
        let mut set = Self::new();
        for phrase in phrases {
            set.add(phrase)?;
        }
        Ok(set)
    }

    /// Appends a phrase. Rejects a phrase whose text or id is already present.
    pub fn add(&mut self, phrase: TriggerPhrase) -> Result<()> {
        if self.phrases.iter().any(|p| p.phrase == phrase.phrase) {
            return Err(VoicecueError::DuplicateTriggerPhrase {
                phrase: phrase.phrase,
            });
        }
        if self.phrases.iter().any(|p| p.id == phrase.id) {
            return Err(VoicecueError::DuplicateTriggerId {
                id: phrase.id.to_string(),
            });
        }
        self.phrases.push(phrase);
        Ok(())
    }

    /// Removes the phrase with the given id, returning it.
    pub fn remove(&mut self, id: &TriggerId) -> Result<TriggerPhrase> {
        let pos = self
            .phrases
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| VoicecueError::UnknownTrigger {
                id: id.to_string(),
            })?;
        Ok(self.phrases.remove(pos))
    }

    pub fn get(&self, id: &TriggerId) -> Option<&TriggerPhrase> {
        self.phrases.iter().find(|p| &p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerPhrase> {
        self.phrases.iter()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn as_slice(&self) -> &[TriggerPhrase] {
        &self.phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase(id: &str, text: &str) -> TriggerPhrase {
        TriggerPhrase::new(TriggerId::new(id), text, false).unwrap()
    }

    #[test]
    fn test_phrase_is_normalized() {
        let p = phrase("a", "  Hello   ASSISTANT ");
        assert_eq!(p.phrase, "hello assistant");
    }

    #[test]
    fn test_empty_phrase_rejected() {
        let result = TriggerPhrase::new(TriggerId::new("a"), "   ", false);
        assert!(matches!(result, Err(VoicecueError::EmptyTriggerPhrase)));
    }

    #[test]
    fn test_numbered_id() {
        assert_eq!(TriggerId::numbered("user", 3).as_str(), "user-3");
    }

    #[test]
    fn test_set_preserves_configured_order() {
        let set = TriggerSet::from_phrases([
            phrase("b", "hello assistant"),
            phrase("a", "good morning"),
        ])
        .unwrap();
        let texts: Vec<_> = set.iter().map(|p| p.phrase.as_str()).collect();
        assert_eq!(texts, vec!["hello assistant", "good morning"]);
    }

    #[test]
    fn test_set_rejects_duplicate_phrase() {
        let mut set = TriggerSet::new();
        set.add(phrase("a", "good morning")).unwrap();
        let err = set.add(phrase("b", "Good  Morning")).unwrap_err();
        assert!(matches!(err, VoicecueError::DuplicateTriggerPhrase { .. }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_rejects_duplicate_id() {
        let mut set = TriggerSet::new();
        set.add(phrase("a", "good morning")).unwrap();
        let err = set.add(phrase("a", "good night")).unwrap_err();
        assert!(matches!(err, VoicecueError::DuplicateTriggerId { ref id } if id == "a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_returns_phrase() {
        let mut set = TriggerSet::from_phrases([phrase("a", "one"), phrase("b", "two")]).unwrap();
        let removed = set.remove(&TriggerId::new("a")).unwrap();
        assert_eq!(removed.phrase, "one");
        assert_eq!(set.len(), 1);
        assert!(set.get(&TriggerId::new("a")).is_none());
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut set = TriggerSet::new();
        let err = set.remove(&TriggerId::new("missing")).unwrap_err();
        assert!(matches!(err, VoicecueError::UnknownTrigger { .. }));
    }
}
