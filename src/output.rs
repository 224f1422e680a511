//! Event rendering for terminal output.
//! Human-readable lines go to stderr; `--json` writes one object per line to stdout.

use crate::engine::{Diagnostic, EngineEvent, MatchTier};
use serde_json::{Value, json};
use std::io::{self, Write};
use std::time::Duration;

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Clear the current terminal line (replaces the live interim line)
pub fn clear_line() {
    eprint!("\r\x1b[2K");
}

fn tier_label(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Priority => "priority",
        MatchTier::Fallback => "fallback",
    }
}

/// One display line for `event`, without trailing newline.
///
/// Interim text is returned too; [`render_event`] draws it in place.
pub fn format_event(event: &EngineEvent) -> String {
    match event {
        EngineEvent::TranscriptUpdated { text } => text.clone(),
        EngineEvent::InterimTranscript { text } => format!("{DIM}{text}\u{2026}{RESET}"),
        EngineEvent::TriggerDetected {
            trigger,
            matched_text,
            tier,
            ..
        } => format!(
            "{GREEN}{BOLD}trigger{RESET} {GREEN}\"{}\"{RESET} {DIM}[{}] matched \"{matched_text}\"{RESET}",
            trigger.phrase,
            tier_label(*tier)
        ),
        EngineEvent::DisplayCleared => {
            format!("{DIM}\u{2500}\u{2500} cleared \u{2500}\u{2500}{RESET}")
        }
        EngineEvent::PlaybackRequested { trigger } => {
            format!("{CYAN}playback{RESET} \"{}\" ({})", trigger.phrase, trigger.id)
        }
        EngineEvent::Diagnostic(Diagnostic::GuardRejected { phrase, tier }) => format!(
            "{YELLOW}rejected{RESET} {DIM}\"{phrase}\" [{}] failed verification{RESET}",
            tier_label(*tier)
        ),
        EngineEvent::Diagnostic(Diagnostic::PlaybackSuppressed {
            trigger,
            listening,
            playing,
        }) => format!(
            "{YELLOW}suppressed{RESET} {DIM}\"{}\" (listening={listening}, playing={playing}){RESET}",
            trigger.phrase
        ),
    }
}

/// Render an event to stderr.
pub fn render_event(event: &EngineEvent) {
    match event {
        EngineEvent::InterimTranscript { .. } => {
            eprint!("\r\x1b[2K{}", format_event(event));
            io::stderr().flush().ok();
        }
        _ => {
            clear_line();
            eprintln!("{}", format_event(event));
        }
    }
}

/// JSON form of an event, stamped with time since replay start.
pub fn event_json(event: &EngineEvent, elapsed: Duration) -> Value {
    let mut value = match event {
        EngineEvent::TranscriptUpdated { text } | EngineEvent::InterimTranscript { text } => {
            json!({ "text": text })
        }
        EngineEvent::TriggerDetected {
            trigger,
            matched_text,
            tier,
            ..
        } => json!({
            "trigger": trigger,
            "matched_text": matched_text,
            "tier": tier,
        }),
        EngineEvent::DisplayCleared => json!({}),
        EngineEvent::PlaybackRequested { trigger } => json!({ "trigger": trigger }),
        EngineEvent::Diagnostic(Diagnostic::GuardRejected { phrase, tier }) => json!({
            "diagnostic": "guard_rejected",
            "phrase": phrase,
            "tier": tier,
        }),
        EngineEvent::Diagnostic(Diagnostic::PlaybackSuppressed {
            trigger,
            listening,
            playing,
        }) => json!({
            "diagnostic": "playback_suppressed",
            "trigger": trigger,
            "listening": listening,
            "playing": playing,
        }),
    };
    if let Value::Object(map) = &mut value {
        map.insert("event".to_string(), json!(event.kind()));
        map.insert("elapsed_ms".to_string(), json!(elapsed.as_millis() as u64));
    }
    value
}

/// Write an event as one JSON line to stdout.
pub fn print_event_json(event: &EngineEvent, elapsed: Duration) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", event_json(event, elapsed))?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triggers::{TriggerId, TriggerPhrase};
    use std::time::Instant;

    fn trigger() -> TriggerPhrase {
        TriggerPhrase::new(TriggerId::new("default-0"), "good morning", true).unwrap()
    }

    fn all_events() -> Vec<EngineEvent> {
        vec![
            EngineEvent::TranscriptUpdated {
                text: "hello there".to_string(),
            },
            EngineEvent::InterimTranscript {
                text: "and".to_string(),
            },
            EngineEvent::TriggerDetected {
                trigger: trigger(),
                matched_text: "good morning".to_string(),
                tier: MatchTier::Priority,
                at: Instant::now(),
            },
            EngineEvent::DisplayCleared,
            EngineEvent::PlaybackRequested { trigger: trigger() },
            EngineEvent::Diagnostic(Diagnostic::GuardRejected {
                phrase: "good morning".to_string(),
                tier: MatchTier::Fallback,
            }),
            EngineEvent::Diagnostic(Diagnostic::PlaybackSuppressed {
                trigger: trigger(),
                listening: true,
                playing: true,
            }),
        ]
    }

    #[test]
    fn test_render_event_doesnt_panic() {
        for event in all_events() {
            render_event(&event);
        }
    }

    #[test]
    fn test_clear_line_doesnt_panic() {
        clear_line();
    }

    #[test]
    fn test_format_transcript_is_plain() {
        let line = format_event(&EngineEvent::TranscriptUpdated {
            text: "hello there".to_string(),
        });
        assert_eq!(line, "hello there");
    }

    #[test]
    fn test_format_trigger_mentions_phrase_and_tier() {
        let line = format_event(&all_events()[2]);
        assert!(line.contains("good morning"));
        assert!(line.contains("[priority]"));
    }

    #[test]
    fn test_format_playback_includes_id() {
        let line = format_event(&EngineEvent::PlaybackRequested { trigger: trigger() });
        assert!(line.contains("default-0"));
    }

    #[test]
    fn test_event_json_shape() {
        let value = event_json(&all_events()[2], Duration::from_millis(1234));

        assert_eq!(value["event"], "trigger_detected");
        assert_eq!(value["elapsed_ms"], 1234);
        assert_eq!(value["tier"], "priority");
        assert_eq!(value["trigger"]["phrase"], "good morning");
        assert_eq!(value["trigger"]["id"], "default-0");
    }

    #[test]
    fn test_event_json_diagnostics() {
        let value = event_json(&all_events()[5], Duration::ZERO);
        assert_eq!(value["event"], "diagnostic");
        assert_eq!(value["diagnostic"], "guard_rejected");
        assert_eq!(value["tier"], "fallback");

        let value = event_json(&all_events()[6], Duration::ZERO);
        assert_eq!(value["diagnostic"], "playback_suppressed");
        assert_eq!(value["playing"], true);
    }

    #[test]
    fn test_event_json_cleared() {
        let value = event_json(&EngineEvent::DisplayCleared, Duration::from_millis(5));
        assert_eq!(value["event"], "display_cleared");
        assert_eq!(value["elapsed_ms"], 5);
    }
}
