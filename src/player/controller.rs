use tracing::{debug, error, info, warn};

use crate::audio::{BLOB_SCHEME, BackendEvent, BackendEventKind, Generation, MediaBackend};
use crate::config::PlaybackSettings;
use crate::library::{Catalog, Track, format_time};

use super::error::ControllerError;
use super::state::{PlayerEvent, PlaylistEntry, Status, ViewState, progress_percent};

/// The playback state machine.
///
/// Owns the catalog and the backend. User commands and backend events come in
/// one at a time; `view()` derives what should be on screen. Every
/// `load_track` bumps the generation so events from superseded loads are
/// dropped.
pub struct Controller<B: MediaBackend> {
    catalog: Catalog,
    backend: B,
    settings: PlaybackSettings,
    status: Status,
    current_index: Option<usize>,
    position_seconds: f64,
    duration_seconds: f64,
    generation: Generation,
    muted: bool,
    events: Vec<PlayerEvent>,
}

impl<B: MediaBackend> Controller<B> {
    pub fn new(catalog: Catalog, mut backend: B, settings: PlaybackSettings, start_muted: bool) -> Self {
        if start_muted {
            backend.set_muted(true);
        }
        let current_index = (!catalog.is_empty()).then_some(0);

        Self {
            catalog,
            backend,
            settings,
            status: Status::Idle,
            current_index,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            generation: 0,
            muted: start_muted,
            events: Vec::new(),
        }
    }

    pub fn play(&mut self) -> Result<(), ControllerError> {
        let actual = self.catalog.len();
        let required = self.settings.min_tracks;
        if actual < required {
            let err = ControllerError::InsufficientTracks { required, actual };
            warn!(required, actual, "refusing to play");
            self.events.push(PlayerEvent::Warning(err.to_string()));
            return Err(err);
        }

        match self.status {
            Status::Playing | Status::Loading => Ok(()),
            Status::Paused | Status::Ended => match self.backend.play() {
                Ok(()) => {
                    self.set_status(Status::Playing);
                    Ok(())
                }
                Err(e) => {
                    error!(error = %e, "backend refused to start playback");
                    Err(ControllerError::PlaybackStart(e))
                }
            },
            Status::Idle => match self.current_index {
                Some(index) => self.load_track(index),
                None => Ok(()),
            },
        }
    }

    pub fn pause(&mut self) {
        if self.status == Status::Playing {
            self.backend.pause();
            self.set_status(Status::Paused);
        }
    }

    pub fn toggle_play(&mut self) -> Result<(), ControllerError> {
        if self.status == Status::Playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Start loading `index`. Playback begins when the backend reports ready.
    pub fn load_track(&mut self, index: usize) -> Result<(), ControllerError> {
        let len = self.catalog.len();
        let Some(track) = self.catalog.get(index) else {
            return Err(ControllerError::IndexOutOfRange { index, len });
        };

        self.generation += 1;
        info!(index, name = %track.name, generation = self.generation, "loading track");
        self.backend.load(&track.uri, self.generation);

        self.current_index = Some(index);
        self.position_seconds = 0.0;
        self.duration_seconds = 0.0;
        self.set_status(Status::Loading);
        self.events.push(PlayerEvent::TrackChanged { index });
        Ok(())
    }

    pub fn next(&mut self) -> Result<(), ControllerError> {
        let n = self.catalog.len();
        if n == 0 {
            return Ok(());
        }
        let i = self.current_index.unwrap_or(0);
        self.load_track((i + 1) % n)
    }

    pub fn previous(&mut self) -> Result<(), ControllerError> {
        let n = self.catalog.len();
        if n == 0 {
            return Ok(());
        }
        let i = self.current_index.unwrap_or(0);
        self.load_track((i + n - 1) % n)
    }

    /// Row activation: the current track toggles, any other row loads.
    pub fn select_track(&mut self, index: usize) -> Result<(), ControllerError> {
        if self.current_index == Some(index) && self.status != Status::Idle {
            self.toggle_play()
        } else {
            self.load_track(index)
        }
    }

    pub fn seek_relative(&mut self, delta_seconds: f64) {
        if self.status == Status::Idle || self.current_index.is_none() {
            return;
        }

        let delta = if delta_seconds.is_finite() { delta_seconds } else { 0.0 };
        let upper = if self.duration_seconds.is_finite() && self.duration_seconds > 0.0 {
            self.duration_seconds
        } else {
            0.0
        };
        let position = (self.position_seconds + delta).clamp(0.0, upper);
        if position == self.position_seconds {
            return;
        }

        debug!(from = self.position_seconds, to = position, "seek");
        self.position_seconds = position;
        self.backend.seek(position);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.backend.set_muted(self.muted);
    }

    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        if event.generation != self.generation {
            debug!(
                event = event.generation,
                current = self.generation,
                "dropping stale backend event"
            );
            return;
        }

        match event.kind {
            BackendEventKind::Ready { duration_seconds } => {
                self.duration_seconds = sanitize(duration_seconds);
                if self.status != Status::Loading {
                    return;
                }
                match self.backend.play() {
                    Ok(()) => self.set_status(Status::Playing),
                    Err(e) => {
                        error!(error = %e, "loaded track failed to start");
                        self.set_status(Status::Paused);
                    }
                }
            }
            BackendEventKind::TimeUpdate {
                position_seconds,
                duration_seconds,
            } => {
                if position_seconds.is_finite() {
                    self.position_seconds = position_seconds.max(0.0);
                }
                if duration_seconds.is_finite() && duration_seconds > 0.0 {
                    self.duration_seconds = duration_seconds;
                }
            }
            BackendEventKind::Ended => {
                self.position_seconds = 0.0;
                self.set_status(Status::Ended);
                let n = self.catalog.len();
                if let Some(i) = self.current_index
                    && n > 0
                {
                    let _ = self.load_track((i + 1) % n);
                }
            }
            BackendEventKind::Error { message } => {
                error!(index = ?self.current_index, %message, "playback error");
                self.position_seconds = 0.0;
                self.set_status(Status::Idle);
            }
            BackendEventKind::PlayFailed { message } => {
                if self.status != Status::Playing {
                    return;
                }
                error!(index = ?self.current_index, %message, "playback did not start");
                self.set_status(Status::Paused);
                self.events
                    .push(PlayerEvent::Warning(format!("playback did not start: {message}")));
            }
        }
    }

    /// Append a freshly ingested track. The first track into an empty
    /// playlist is loaded right away when autoplay is on.
    pub fn on_track_ingested(&mut self, track: Track) {
        let was_empty = self.catalog.is_empty();
        let was_saved = self.catalog.is_persistent();
        let name = track.name.clone();
        match self.catalog.append(track) {
            Ok(index) => {
                info!(index, %name, "track added");
                if was_saved && !self.catalog.is_persistent() {
                    self.events.push(PlayerEvent::Warning(
                        "playlist can no longer be saved, changes last until exit".to_string(),
                    ));
                }
                if was_empty {
                    self.current_index = Some(0);
                    if self.settings.autoplay_first_track {
                        let _ = self.load_track(0);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "track not added");
                self.events.push(PlayerEvent::Warning(e.to_string()));
            }
        }
    }

    pub fn view(&self) -> ViewState {
        let title = self
            .current_index
            .and_then(|i| self.catalog.get(i))
            .map(|t| t.name.clone());
        let playlist = self
            .catalog
            .tracks()
            .iter()
            .map(|t| PlaylistEntry {
                name: t.name.clone(),
                duration_label: t.duration_label.clone(),
                author: t.author.clone(),
                session_only: t.uri.starts_with(BLOB_SCHEME),
            })
            .collect();

        ViewState {
            timer_label: format_time(self.position_seconds),
            duration_label: format_time(self.duration_seconds),
            progress_percent: progress_percent(self.position_seconds, self.duration_seconds),
            current_index: self.current_index,
            title,
            status: self.status,
            playlist,
            is_playing: self.status == Status::Playing,
            is_muted: self.muted,
            is_saved: self.catalog.is_persistent(),
        }
    }

    /// Take the notifications queued since the last call.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn position_seconds(&self) -> f64 {
        self.position_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn set_status(&mut self, to: Status) {
        let from = self.status;
        if from == to {
            return;
        }
        debug!(%from, %to, "status");
        self.status = to;
        self.events.push(PlayerEvent::StatusChanged { from, to });
    }
}

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 }
}
