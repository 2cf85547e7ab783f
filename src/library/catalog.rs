use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::model::{Track, TrackId};
use super::store::KvStore;

/// Storage key the playlist is kept under unless configured otherwise.
pub const DEFAULT_PLAYLIST_KEY: &str = "audioPlaylist";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("track {0} is already in the playlist")]
    DuplicateId(TrackId),
    #[error("failed to persist playlist: {0}")]
    Persistence(String),
}

/// The ordered playlist. Insertion order is playback order.
///
/// Every successful `append` writes the whole list through to the store.
/// The first failed write switches the catalog to in-memory only for the
/// rest of the session.
pub struct Catalog {
    tracks: Vec<Track>,
    store: Box<dyn KvStore>,
    key: String,
    persistent: bool,
}

impl Catalog {
    /// Read the playlist stored under `key`.
    ///
    /// Missing, unreadable or corrupt data yields an empty catalog; the
    /// problem is logged and never propagated.
    pub fn load_persisted(store: Box<dyn KvStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let tracks = match store.get(&key) {
            Ok(Some(raw)) => decode_playlist(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "could not read persisted playlist");
                Vec::new()
            }
        };
        info!(key = %key, count = tracks.len(), "loaded playlist");

        Self {
            tracks,
            store,
            key,
            persistent: true,
        }
    }

    /// Add `track` at the end and return its index.
    ///
    /// Persistence failures are logged, not returned: the track stays in the
    /// in-memory playlist either way.
    pub fn append(&mut self, track: Track) -> Result<usize, CatalogError> {
        if self.tracks.iter().any(|t| t.id == track.id) {
            return Err(CatalogError::DuplicateId(track.id));
        }

        self.tracks.push(track);
        let _ = self.persist();
        Ok(self.tracks.len() - 1)
    }

    /// Write the full playlist to the store.
    pub fn persist(&mut self) -> Result<(), CatalogError> {
        if !self.persistent {
            return Ok(());
        }

        let result = serde_json::to_string(&self.tracks)
            .map_err(|e| CatalogError::Persistence(e.to_string()))
            .and_then(|raw| {
                self.store
                    .set(&self.key, &raw)
                    .map_err(|e| CatalogError::Persistence(e.to_string()))
            });

        match &result {
            Ok(()) => debug!(count = self.tracks.len(), "playlist persisted"),
            Err(e) => {
                error!(error = %e, "playlist persistence disabled for this session");
                self.persistent = false;
            }
        }
        result
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Whether writes still reach the store.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }
}

fn decode_playlist(raw: &str) -> Vec<Track> {
    // A stored `null` is treated like an absent playlist.
    let tracks = match serde_json::from_str::<Option<Vec<Track>>>(raw) {
        Ok(tracks) => tracks.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "discarding corrupt persisted playlist");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|t| {
            let fresh = seen.insert(t.id.clone());
            if !fresh {
                warn!(id = %t.id, "dropping duplicate playlist entry");
            }
            fresh
        })
        .collect()
}
