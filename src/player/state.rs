//! Controller states and the read-only view derived from them.

use std::fmt;

/// Where the controller is in the playback state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Status {
    /// Nothing loaded into the backend.
    #[default]
    Idle,
    /// A track was requested and the backend is preparing it.
    Loading,
    Playing,
    Paused,
    /// The current track reached its end; auto-advance follows immediately.
    Ended,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Idle => "Idle",
            Status::Loading => "Loading",
            Status::Playing => "Playing",
            Status::Paused => "Paused",
            Status::Ended => "Ended",
        };
        f.write_str(s)
    }
}

/// Notifications queued by the controller for the presentation and the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    StatusChanged { from: Status, to: Status },
    TrackChanged { index: usize },
    Warning(String),
}

/// One playlist row as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub name: String,
    pub duration_label: String,
    pub author: String,
    /// Backed by in-memory bytes that will not survive a restart.
    pub session_only: bool,
}

/// Everything the presentation needs to render one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub timer_label: String,
    pub duration_label: String,
    pub progress_percent: f64,
    pub current_index: Option<usize>,
    pub title: Option<String>,
    pub status: Status,
    pub playlist: Vec<PlaylistEntry>,
    pub is_playing: bool,
    pub is_muted: bool,
    /// False once the playlist store has failed and changes stay in memory.
    pub is_saved: bool,
}

/// `100 * position / duration`, 0 when the duration is unusable.
pub fn progress_percent(position_seconds: f64, duration_seconds: f64) -> f64 {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 || !position_seconds.is_finite() {
        return 0.0;
    }
    (100.0 * position_seconds / duration_seconds).clamp(0.0, 100.0)
}
