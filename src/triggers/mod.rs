//! Trigger phrase model and its persistence collaborator.

pub mod phrase;
pub mod store;

pub use phrase::{TriggerId, TriggerPhrase, TriggerSet, normalize_phrase};
pub use store::{TomlTriggerStore, TriggerStore};
