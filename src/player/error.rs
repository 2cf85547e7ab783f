use thiserror::Error;

use crate::audio::BackendError;

#[derive(Debug, Error)]
pub enum ControllerError {
    /// A user-facing policy refusal rather than a fault.
    #[error("add at least {required} tracks to play (playlist has {actual})")]
    InsufficientTracks { required: usize, actual: usize },

    #[error("track index {index} is out of range for a playlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("playback did not start: {0}")]
    PlaybackStart(#[source] BackendError),
}
