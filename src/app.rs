//! Application entry points.
//!
//! Wires the pieces together for the CLI:
//! script → driver (engine) → render + playback → driver

use crate::config::{Config, EngineConfig};
use crate::defaults::CHANNEL_CAPACITY;
use crate::driver::SessionDriver;
use crate::engine::{Engine, EngineEvent};
use crate::error::{Result, VoicecueError};
use crate::output::{print_event_json, render_event};
use crate::playback::{AnnouncePlayback, PlaybackSink, spawn_playback};
use crate::script::{ScriptStep, parse_script, read_script, total_wait};
use crate::triggers::{TomlTriggerStore, TriggerId, TriggerPhrase, TriggerSet, TriggerStore};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Options for `voicecue replay`.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Script file; `None` reads stdin.
    pub script: Option<PathBuf>,
    /// Overrides `engine.pause_duration_ms`.
    pub pause: Option<Duration>,
    pub json: bool,
    pub quiet: bool,
}

/// What happened during a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub transcript_updates: usize,
    pub triggers: usize,
    pub playbacks: usize,
}

impl ReplaySummary {
    fn record(&mut self, event: &EngineEvent) {
        self.events += 1;
        match event {
            EngineEvent::TranscriptUpdated { .. } => self.transcript_updates += 1,
            EngineEvent::TriggerDetected { .. } => self.triggers += 1,
            EngineEvent::PlaybackRequested { .. } => self.playbacks += 1,
            _ => {}
        }
    }
}

/// Run the replay command: script → engine → terminal.
pub async fn run_replay_command(config: &Config, options: ReplayOptions) -> Result<ReplaySummary> {
    let steps = match &options.script {
        Some(path) => parse_script(&fs::read_to_string(path)?)?,
        None => read_script(io::stdin().lock())?,
    };
    debug!(
        steps = steps.len(),
        scripted = ?total_wait(&steps),
        "Script loaded"
    );

    let triggers = load_trigger_set(config)?;
    if triggers.is_empty() {
        warn!("No trigger phrases configured; nothing can fire");
    }

    let mut engine_config = config.engine_config();
    if let Some(pause) = options.pause {
        engine_config.pause_duration = pause;
    }

    let sink = AnnouncePlayback::new(
        Duration::from_millis(config.playback.simulated_duration_ms),
        options.quiet || options.json,
    );

    let json = options.json;
    let quiet = options.quiet;
    let summary = replay(engine_config, triggers, steps, Box::new(sink), |event, elapsed| {
        if json {
            if let Err(e) = print_event_json(event, elapsed) {
                warn!(error = %e, "Failed to write event");
            }
        } else if !quiet {
            render_event(event);
        }
    })
    .await?;

    info!(?summary, "Replay finished");
    Ok(summary)
}

/// Feed `steps` through a fresh session in real (tokio) time.
///
/// `on_event` sees every engine event with the time since the replay began.
/// Returns once the script is exhausted and every pending timer has fired.
pub async fn replay<F>(
    engine_config: EngineConfig,
    triggers: TriggerSet,
    steps: Vec<ScriptStep>,
    sink: Box<dyn PlaybackSink>,
    mut on_event: F,
) -> Result<ReplaySummary>
where
    F: FnMut(&EngineEvent, Duration),
{
    let (input_tx, input_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (event_tx, mut event_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let engine = Engine::new(engine_config, triggers);
    let driver = tokio::spawn(SessionDriver::new(engine).run(input_rx, event_tx));
    let (playback_tx, playback) = spawn_playback(sink, input_tx.downgrade());

    let feeder = tokio::spawn(async move {
        for step in steps {
            if let Some(wait) = step.wait() {
                tokio::time::sleep(wait).await;
                continue;
            }
            if let Some(input) = step.to_input()
                && input_tx.send(input).await.is_err()
            {
                debug!("Driver stopped before the script ended");
                break;
            }
        }
    });

    let start = Instant::now();
    let mut summary = ReplaySummary::default();
    while let Some(event) = event_rx.recv().await {
        on_event(&event, start.elapsed());
        summary.record(&event);
        if let EngineEvent::PlaybackRequested { trigger } = &event
            && playback_tx.send(trigger.clone()).await.is_err()
        {
            warn!(phrase = %trigger.phrase, "Playback task gone");
        }
    }

    feeder.await.map_err(join_error)?;
    drop(playback_tx);
    playback.await.map_err(join_error)?;
    driver.await.map_err(join_error)??;
    Ok(summary)
}

fn join_error(e: tokio::task::JoinError) -> VoicecueError {
    VoicecueError::Other(format!("Task failed: {}", e))
}

fn trigger_store(config: &Config) -> TomlTriggerStore {
    TomlTriggerStore::new(config.trigger_store_path())
}

/// Active trigger set: configured defaults, then stored user phrases.
pub fn load_trigger_set(config: &Config) -> Result<TriggerSet> {
    config.trigger_set(trigger_store(config).load()?)
}

/// Add a user phrase to the store. Rejects phrases already active.
pub fn add_user_trigger(config: &Config, phrase: &str) -> Result<TriggerPhrase> {
    let store = trigger_store(config);
    let mut set = config.trigger_set(store.load()?)?;
    let trigger = TriggerPhrase::new(store.next_id()?, phrase, false)?;
    set.add(trigger.clone())?;
    store.save(set.as_slice())?;
    info!(id = %trigger.id, phrase = %trigger.phrase, "Trigger added");
    Ok(trigger)
}

/// Remove a user phrase from the store. Defaults live in the config file.
pub fn remove_user_trigger(config: &Config, id: &str) -> Result<TriggerPhrase> {
    let store = trigger_store(config);
    let mut set = config.trigger_set(store.load()?)?;
    let id = TriggerId::new(id);
    if set.get(&id).is_some_and(|t| t.is_default) {
        return Err(VoicecueError::DefaultTriggerImmutable { id: id.to_string() });
    }
    let removed = set.remove(&id)?;
    store.save(set.as_slice())?;
    info!(id = %removed.id, "Trigger removed");
    Ok(removed)
}
