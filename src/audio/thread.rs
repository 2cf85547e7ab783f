use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use super::probe::read_media_info;
use super::registry::BlobRegistry;
use super::sink::create_sink_at;
use super::types::{AudioCmd, BackendError, BackendEvent, BackendEventKind, EventSender, Generation};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: EventSender,
    registry: BlobRegistry,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which would
                // scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!(error = %e, "no audio output device, playback disabled");
                None
            }
        };

        let mut deck = Deck::new(events);
        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit) => {
                    deck.stop();
                    break;
                }
                Ok(cmd) => deck.handle(cmd, stream.as_ref(), &registry),
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    deck.stop();
                    break;
                }
            }
        }
    })
}

/// What the audio thread currently has loaded.
struct Loaded {
    sink: Sink,
    generation: Generation,
    uri: String,
    bytes: Arc<[u8]>,
    duration: f64,
}

struct Deck {
    events: EventSender,
    // Generation of the latest `Load`, even when it failed.
    generation: Generation,
    loaded: Option<Loaded>,
    paused: bool,
    muted: bool,
    ended: bool,
    // Elapsed time is tracked as accumulated + time since last resume.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Deck {
    fn new(events: EventSender) -> Self {
        Self {
            events,
            generation: 0,
            loaded: None,
            paused: true,
            muted: false,
            ended: false,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    fn handle(&mut self, cmd: AudioCmd, stream: Option<&OutputStream>, registry: &BlobRegistry) {
        match cmd {
            AudioCmd::Load { uri, generation } => {
                self.generation = generation;
                match stream {
                    Some(stream) => self.load(stream, registry, uri, generation),
                    None => {
                        self.stop();
                        self.emit(
                            generation,
                            BackendEventKind::Error {
                                message: "no audio output device".to_string(),
                            },
                        );
                    }
                }
            }
            AudioCmd::Play => {
                if let Err(e) = self.play() {
                    warn!(error = %e, "play refused");
                    self.emit(
                        self.generation,
                        BackendEventKind::PlayFailed {
                            message: e.to_string(),
                        },
                    );
                }
            }
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(position) => {
                if let Some(stream) = stream {
                    self.seek(stream, position);
                }
            }
            AudioCmd::SetMuted(muted) => {
                self.muted = muted;
                if let Some(loaded) = &self.loaded {
                    loaded.sink.set_volume(self.volume());
                }
            }
            AudioCmd::Quit => self.stop(),
        }
    }

    fn load(&mut self, stream: &OutputStream, registry: &BlobRegistry, uri: String, generation: Generation) {
        self.stop();

        let prepared = registry.fetch(&uri).and_then(|bytes| {
            let (sink, total) = create_sink_at(stream, &uri, bytes.clone(), Duration::ZERO)?;
            let duration = match total {
                Some(d) => d.as_secs_f64(),
                None => read_media_info(&uri, bytes.clone())
                    .map(|info| info.duration_seconds)
                    .unwrap_or(0.0),
            };
            Ok((sink, bytes, duration))
        });

        match prepared {
            Ok((sink, bytes, duration)) => {
                sink.set_volume(self.volume());
                debug!(uri = %uri, generation, duration, "track loaded");
                self.loaded = Some(Loaded {
                    sink,
                    generation,
                    uri,
                    bytes,
                    duration,
                });
                self.emit(
                    generation,
                    BackendEventKind::Ready {
                        duration_seconds: duration,
                    },
                );
            }
            Err(e) => {
                warn!(uri = %uri, generation, error = %e, "failed to load track");
                self.emit(
                    generation,
                    BackendEventKind::Error {
                        message: e.to_string(),
                    },
                );
            }
        }
    }

    fn play(&mut self) -> Result<(), BackendError> {
        let Some(loaded) = &self.loaded else {
            return Err(BackendError::Unavailable("nothing loaded".to_string()));
        };
        if self.ended {
            return Err(BackendError::Unavailable("track already ended".to_string()));
        }
        loaded.sink.play();
        if self.paused {
            self.started_at = Some(Instant::now());
            self.paused = false;
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(loaded) = &self.loaded {
            loaded.sink.pause();
        }
        if !self.paused {
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.paused = true;
        }
    }

    fn seek(&mut self, stream: &OutputStream, position: f64) {
        let volume = self.volume();
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };

        let mut position = if position.is_finite() { position.max(0.0) } else { 0.0 };
        if loaded.duration > 0.0 {
            position = position.min(loaded.duration);
        }
        let target = Duration::from_secs_f64(position);

        // Scrubbing: rebuild the current sink and skip into the resource.
        match create_sink_at(stream, &loaded.uri, loaded.bytes.clone(), target) {
            Ok((sink, _)) => {
                loaded.sink.stop();
                sink.set_volume(volume);
                if self.paused {
                    self.started_at = None;
                } else {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                loaded.sink = sink;
                self.accumulated = target;
                self.ended = false;
                let generation = loaded.generation;
                let duration = loaded.duration;
                self.emit(
                    generation,
                    BackendEventKind::TimeUpdate {
                        position_seconds: position,
                        duration_seconds: duration,
                    },
                );
            }
            Err(e) => warn!(error = %e, "seek failed"),
        }
    }

    fn tick(&mut self) {
        if self.paused || self.ended {
            return;
        }
        let Some(loaded) = &self.loaded else {
            return;
        };
        let generation = loaded.generation;
        let duration = loaded.duration;

        if loaded.sink.empty() {
            self.pause();
            self.ended = true;
            self.emit(generation, BackendEventKind::Ended);
        } else {
            let position = self.elapsed().as_secs_f64();
            self.emit(
                generation,
                BackendEventKind::TimeUpdate {
                    position_seconds: position,
                    duration_seconds: duration,
                },
            );
        }
    }

    fn stop(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            loaded.sink.stop();
        }
        self.paused = true;
        self.ended = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn volume(&self) -> f32 {
        if self.muted { 0.0 } else { 1.0 }
    }

    fn emit(&self, generation: Generation, kind: BackendEventKind) {
        // The receiver only goes away while shutting down.
        let _ = self.events.send(BackendEvent::new(generation, kind));
    }
}
