//! The seams between the playback controller / ingestion pipeline and
//! whatever actually produces sound.

use std::sync::Arc;

use async_trait::async_trait;

use crate::library::SelectedFile;

use super::types::{BackendError, Generation, MediaInfo};

/// Playback commands. Results of `load` arrive asynchronously as
/// [`BackendEvent`](super::BackendEvent)s carrying the same generation.
pub trait MediaBackend {
    fn load(&mut self, uri: &str, generation: Generation);
    /// Start or resume the loaded resource.
    fn play(&mut self) -> Result<(), BackendError>;
    fn pause(&mut self);
    fn seek(&mut self, position_seconds: f64);
    fn set_muted(&mut self, muted: bool);
}

/// Turns file contents into playable handles and reads their metadata
/// without playing them.
#[async_trait]
pub trait MediaProbe: Clone + Send + Sync + 'static {
    /// Register `bytes` read from `file` and return the URI to play it by.
    fn create_object_uri(&self, file: &SelectedFile, bytes: Arc<[u8]>) -> String;

    /// Report the metadata of `bytes`, the contents behind `uri`, without
    /// playing them.
    async fn probe(&self, uri: &str, bytes: Arc<[u8]>) -> Result<MediaInfo, BackendError>;
}
