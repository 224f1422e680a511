//! Default configuration constants for voicecue.
//!
//! Shared between the TOML configuration and the engine-facing config so the
//! two can never disagree.

/// Default pause duration in milliseconds after a confirmed trigger match.
///
/// 1500ms (1.5 seconds) is long enough that a speaker who is merely taking a
/// breath mid-sentence resumes before playback is requested.
pub const PAUSE_DURATION_MS: u64 = 1500;

/// Default settle delay in milliseconds.
///
/// Quiet period used to coalesce bursts of final results into one committed
/// transcript update. Not the user-facing pause duration.
pub const SETTLE_DELAY_MS: u64 = 300;

/// Default size of the fallback recency window, in characters.
///
/// Measured in characters (not words) over the lowercased recent transcript.
pub const RECENCY_WINDOW_CHARS: usize = 200;

/// How long the terminal playback sink pretends to play, in milliseconds.
pub const SIMULATED_PLAYBACK_MS: u64 = 0;

/// Id prefix for trigger phrases seeded from the configuration file.
pub const DEFAULT_TRIGGER_ID_PREFIX: &str = "default";

/// Id prefix for trigger phrases added by the user and persisted in the store.
pub const USER_TRIGGER_ID_PREFIX: &str = "user";

/// Capacity of the driver's input and output channels.
pub const CHANNEL_CAPACITY: usize = 64;
