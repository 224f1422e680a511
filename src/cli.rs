//! Command-line interface for voicecue
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Trigger phrase detection for live speech recognition
#[derive(Parser, Debug)]
#[command(
    name = "voicecue",
    version = crate::version_string(),
    about = "Trigger phrase detection for live speech recognition"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: debug logs, -vv: trace logs)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a pause duration.
///
/// Bare numbers are milliseconds; anything else goes through `humantime`
/// (`1500ms`, `1.5s`, `2s`).
fn parse_pause(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let duration = match s.parse::<u64>() {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => humantime::parse_duration(s).map_err(|e| e.to_string())?,
    };
    if duration.is_zero() {
        return Err("pause must be positive".to_string());
    }
    Ok(duration)
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded recognition session (JSON lines) through the engine
    Replay {
        /// Script file (default: stdin)
        #[arg(value_name = "SCRIPT")]
        script: Option<PathBuf>,

        /// Pause required after a trigger before playback. Examples: 1500, 800ms, 2s
        #[arg(long, value_name = "DURATION", value_parser = parse_pause)]
        pause: Option<Duration>,

        /// Write events as JSON lines to stdout
        #[arg(long)]
        json: bool,
    },

    /// Manage user trigger phrases
    Triggers {
        #[command(subcommand)]
        action: TriggersAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Trigger phrase actions
#[derive(Subcommand, Debug)]
pub enum TriggersAction {
    /// List active trigger phrases (defaults first)
    List,
    /// Add a user trigger phrase
    Add {
        /// Phrase to listen for (e.g., "good morning")
        phrase: String,
    },
    /// Remove a user trigger phrase by id
    Remove {
        /// Trigger id as shown by `triggers list` (e.g., user-0)
        id: String,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}
