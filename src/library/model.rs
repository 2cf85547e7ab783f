use std::fmt;

use serde::{Deserialize, Serialize};

use super::display::{display_or, format_time};

/// Name used when a file reports no usable name.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Author used when no artist tag was found.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Opaque identifier of a playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier (16 hex digits).
    pub fn random() -> Self {
        Self(format!("{:016x}", rand::random::<u64>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One playable item of the playlist.
///
/// The serialized shape is `{id, name, uri, duration, author}`. Playlists
/// written before ids existed store the location under `file` and get a
/// fresh id when they are read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default = "TrackId::random")]
    pub id: TrackId,
    #[serde(default = "default_title")]
    pub name: String,
    #[serde(alias = "file")]
    pub uri: String,
    /// Total length rendered as `MM:SS`.
    #[serde(rename = "duration", default = "default_duration_label")]
    pub duration_label: String,
    #[serde(default = "default_author")]
    pub author: String,
}

impl Track {
    /// Build a track with a fresh id, applying the title/artist fallbacks.
    pub fn new(
        name: Option<&str>,
        uri: impl Into<String>,
        duration_seconds: f64,
        author: Option<&str>,
    ) -> Self {
        Self {
            id: TrackId::random(),
            name: display_or(name, UNKNOWN_TITLE),
            uri: uri.into(),
            duration_label: format_time(duration_seconds),
            author: display_or(author, UNKNOWN_ARTIST),
        }
    }
}

fn default_title() -> String {
    UNKNOWN_TITLE.to_string()
}

fn default_author() -> String {
    UNKNOWN_ARTIST.to_string()
}

fn default_duration_label() -> String {
    format_time(0.0)
}
