//! Async session driver.
//!
//! Owns one [`Engine`] and serializes everything that touches it: inputs from
//! the recognizer and UI arrive on one channel, timer expiries come from
//! sleeping until [`Engine::next_deadline`]. Each reaction runs to completion
//! before the next one starts.

use crate::engine::{Engine, EngineEvent, RecognitionEvent};
use crate::error::{Result, VoicecueError};
use crate::triggers::{TriggerId, TriggerPhrase};
use std::time::Instant as StdInstant;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Everything the outside world can ask of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverInput {
    Recognition(RecognitionEvent),
    Start,
    Stop,
    Clear,
    /// The playback collaborator is done.
    PlaybackFinished,
    AddTrigger(TriggerPhrase),
    RemoveTrigger(TriggerId),
}

#[derive(Debug)]
pub struct SessionDriver {
    engine: Engine,
}

impl SessionDriver {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run until `inputs` is closed and no timer is left pending.
    ///
    /// Returns the engine so callers can inspect the final state. Fails only
    /// when the event receiver goes away.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<DriverInput>,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<Engine> {
        let mut inputs_open = true;

        loop {
            let deadline = self.engine.next_deadline().map(Instant::from_std);
            if !inputs_open && deadline.is_none() {
                break;
            }

            let produced = tokio::select! {
                biased;

                _ = wait_until(deadline) => self.engine.poll_timers(now()),
                input = inputs.recv(), if inputs_open => match input {
                    Some(input) => self.apply(input),
                    None => {
                        debug!("Input channel closed, draining timers");
                        inputs_open = false;
                        Vec::new()
                    }
                },
            };

            for event in produced {
                events
                    .send(event)
                    .await
                    .map_err(|e| VoicecueError::ChannelClosed {
                        message: format!("event receiver dropped: {}", e.0.kind()),
                    })?;
            }
        }

        Ok(self.engine)
    }

    fn apply(&mut self, input: DriverInput) -> Vec<EngineEvent> {
        match input {
            DriverInput::Recognition(event) => self.engine.handle_event(&event, now()),
            DriverInput::Start => {
                self.engine.start();
                Vec::new()
            }
            DriverInput::Stop => {
                self.engine.stop();
                Vec::new()
            }
            DriverInput::Clear => self.engine.clear(),
            DriverInput::PlaybackFinished => {
                self.engine.playback_finished();
                Vec::new()
            }
            DriverInput::AddTrigger(trigger) => {
                if let Err(e) = self.engine.add_trigger(trigger) {
                    warn!(error = %e, "Trigger not added");
                }
                Vec::new()
            }
            DriverInput::RemoveTrigger(id) => {
                if let Err(e) = self.engine.remove_trigger(&id) {
                    warn!(error = %e, "Trigger not removed");
                }
                Vec::new()
            }
        }
    }
}

/// Current time on the tokio clock, so paused test time drives the engine.
fn now() -> StdInstant {
    Instant::now().into_std()
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
