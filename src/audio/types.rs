//! Audio-related small types and handles.
//!
//! This module defines the commands understood by the audio thread, the
//! events it reports back, and the error type shared by the backend traits.

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Monotonic token identifying one `load` request.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("cannot open {uri}: {reason}")]
    Open { uri: String, reason: String },
    #[error("cannot decode {uri}: {reason}")]
    Decode { uri: String, reason: String },
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}

/// Notification from the media backend, tagged with the generation of the
/// `load` it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendEvent {
    pub generation: Generation,
    pub kind: BackendEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendEventKind {
    /// The resource is decoded and can start playing.
    Ready { duration_seconds: f64 },
    /// Periodic position report while playing.
    TimeUpdate {
        position_seconds: f64,
        duration_seconds: f64,
    },
    /// The resource played to its natural end.
    Ended,
    /// The resource could not be loaded.
    Error { message: String },
    /// A `play` command reached the audio thread but could not start.
    PlayFailed { message: String },
}

impl BackendEvent {
    pub fn new(generation: Generation, kind: BackendEventKind) -> Self {
        Self { generation, kind }
    }
}

pub type EventSender = UnboundedSender<BackendEvent>;

/// Metadata read from a probed resource.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub duration_seconds: f64,
    pub artist: Option<String>,
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Decode `uri` into a paused sink tagged with `generation`.
    Load { uri: String, generation: Generation },
    /// Start or resume the loaded sink. A refusal comes back as
    /// `BackendEventKind::PlayFailed`.
    Play,
    Pause,
    /// Jump to an absolute position in seconds.
    Seek(f64),
    SetMuted(bool),
    Quit,
}
