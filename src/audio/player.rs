use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::warn;

use super::backend::MediaBackend;
use super::registry::BlobRegistry;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, BackendError, BackendEvent, Generation};

/// Media backend driving a `rodio` sink on a dedicated audio thread.
pub struct RodioBackend {
    tx: Sender<AudioCmd>,
    join: Option<JoinHandle<()>>,
}

impl RodioBackend {
    /// Spawn the audio thread. Its events arrive on the returned receiver.
    pub fn new(registry: BlobRegistry, tick: Duration) -> (Self, UnboundedReceiver<BackendEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = unbounded_channel();

        let join = spawn_audio_thread(rx, events_tx, registry, tick);

        (
            Self {
                tx,
                join: Some(join),
            },
            events_rx,
        )
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            warn!("audio thread has stopped, command dropped");
        }
    }
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, uri: &str, generation: Generation) {
        self.send(AudioCmd::Load {
            uri: uri.to_string(),
            generation,
        });
    }

    /// Never blocks the caller. Only a dead audio thread fails here; a sink
    /// that cannot start is reported later as `PlayFailed`.
    fn play(&mut self) -> Result<(), BackendError> {
        self.tx
            .send(AudioCmd::Play)
            .map_err(|_| BackendError::Unavailable("audio thread has stopped".to_string()))
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position_seconds: f64) {
        self.send(AudioCmd::Seek(position_seconds));
    }

    fn set_muted(&mut self, muted: bool) {
        self.send(AudioCmd::SetMuted(muted));
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
