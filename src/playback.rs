//! Playback collaborator: plays the response for a confirmed trigger and
//! tells the driver when it is done.

use crate::driver::DriverInput;
use crate::error::Result;
use crate::triggers::TriggerPhrase;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Pluggable playback handler.
#[async_trait]
pub trait PlaybackSink: Send + 'static {
    /// Play the response for `trigger`; returns when playback has finished.
    async fn play(&mut self, trigger: &TriggerPhrase) -> Result<()>;

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "playback"
    }
}

/// Announces the trigger on stderr and "plays" for a fixed duration.
#[derive(Debug, Clone)]
pub struct AnnouncePlayback {
    duration: Duration,
    quiet: bool,
}

impl AnnouncePlayback {
    pub fn new(duration: Duration, quiet: bool) -> Self {
        Self { duration, quiet }
    }
}

#[async_trait]
impl PlaybackSink for AnnouncePlayback {
    async fn play(&mut self, trigger: &TriggerPhrase) -> Result<()> {
        if !self.quiet {
            crate::output::clear_line();
            eprintln!("\u{25b6} playing response for \"{}\"", trigger.phrase);
        }
        if !self.duration.is_zero() {
            tokio::time::sleep(self.duration).await;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "announce"
    }
}

/// Records every played trigger. For testing and embedding.
#[derive(Debug, Clone, Default)]
pub struct CollectorPlayback {
    played: Arc<Mutex<Vec<TriggerPhrase>>>,
}

impl CollectorPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers played so far, in order.
    pub fn played(&self) -> Vec<TriggerPhrase> {
        self.played
            .lock()
            .map(|played| played.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PlaybackSink for CollectorPlayback {
    async fn play(&mut self, trigger: &TriggerPhrase) -> Result<()> {
        if let Ok(mut played) = self.played.lock() {
            played.push(trigger.clone());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Spawn a task that plays each requested trigger in turn.
///
/// After every playback, successful or not, `PlaybackFinished` is sent to the
/// driver. The driver sender is weak so this task never keeps a finished
/// session alive.
pub fn spawn_playback(
    mut sink: Box<dyn PlaybackSink>,
    driver: mpsc::WeakSender<DriverInput>,
) -> (mpsc::Sender<TriggerPhrase>, JoinHandle<()>) {
    let (tx, mut requests) = mpsc::channel::<TriggerPhrase>(crate::defaults::CHANNEL_CAPACITY);
    let handle = tokio::spawn(async move {
        while let Some(trigger) = requests.recv().await {
            debug!(sink = sink.name(), phrase = %trigger.phrase, "Playback started");
            if let Err(e) = sink.play(&trigger).await {
                warn!(sink = sink.name(), error = %e, "Playback failed");
            }
            let Some(driver) = driver.upgrade() else {
                debug!("Driver gone, dropping playback completion");
                continue;
            };
            if driver.send(DriverInput::PlaybackFinished).await.is_err() {
                debug!("Driver closed before playback completion");
            }
        }
    });
    (tx, handle)
}
