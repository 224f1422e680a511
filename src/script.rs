//! Replay scripts: recorded recognizer sessions as JSON lines.
//!
//! ```text
//! {"type":"start"}
//! {"type":"result","result_index":0,"results":[{"text":"good","is_final":false}]}
//! {"type":"wait","ms":400}
//! {"type":"result","result_index":0,"results":[{"text":"good morning","is_final":true}]}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::driver::DriverInput;
use crate::engine::{RecognitionEvent, RecognitionSegment};
use crate::error::{Result, VoicecueError};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    Result {
        #[serde(default)]
        result_index: usize,
        results: Vec<RecognitionSegment>,
    },
    Wait {
        ms: u64,
    },
    Start,
    Stop,
    Clear,
    PlaybackFinished,
}

impl ScriptStep {
    /// The driver input for this step; `None` for waits.
    pub fn to_input(&self) -> Option<DriverInput> {
        match self {
            ScriptStep::Result {
                result_index,
                results,
            } => Some(DriverInput::Recognition(RecognitionEvent::new(
                *result_index,
                results.clone(),
            ))),
            ScriptStep::Wait { .. } => None,
            ScriptStep::Start => Some(DriverInput::Start),
            ScriptStep::Stop => Some(DriverInput::Stop),
            ScriptStep::Clear => Some(DriverInput::Clear),
            ScriptStep::PlaybackFinished => Some(DriverInput::PlaybackFinished),
        }
    }

    pub fn wait(&self) -> Option<Duration> {
        match self {
            ScriptStep::Wait { ms } => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }
}

/// Parse a whole script. Errors carry the 1-based line number.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| parse_line(i + 1, line).transpose())
        .collect()
}

/// Parse a script from any reader, e.g. stdin.
pub fn read_script(reader: impl BufRead) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(step) = parse_line(i + 1, &line?)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

fn parse_line(line_number: usize, line: &str) -> Result<Option<ScriptStep>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| VoicecueError::ScriptParse {
            line: line_number,
            message: e.to_string(),
        })
}

/// Total scripted wait time.
pub fn total_wait(steps: &[ScriptStep]) -> Duration {
    steps.iter().filter_map(ScriptStep::wait).sum()
}
