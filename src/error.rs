//! Error types for voicecue.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoicecueError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Trigger phrase errors
    #[error("Trigger phrase is empty")]
    EmptyTriggerPhrase,

    #[error("Trigger phrase already configured: {phrase}")]
    DuplicateTriggerPhrase { phrase: String },

    #[error("Trigger id already in use: {id}")]
    DuplicateTriggerId { id: String },

    #[error("Unknown trigger id: {id}")]
    UnknownTrigger { id: String },

    #[error("Trigger {id} is a default phrase; remove it from the configuration instead")]
    DefaultTriggerImmutable { id: String },

    #[error("Trigger store error at {path}: {message}")]
    TriggerStore { path: String, message: String },

    // Replay script errors
    #[error("Script parse error on line {line}: {message}")]
    ScriptParse { line: usize, message: String },

    // Session driver errors
    #[error("Session channel closed: {message}")]
    ChannelClosed { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoicecueError>;
