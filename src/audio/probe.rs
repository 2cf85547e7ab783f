use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use lofty::{Accessor, AudioFile, Probe, TaggedFileExt};
use tracing::debug;

use crate::library::SelectedFile;

use super::backend::MediaProbe;
use super::registry::{BlobRegistry, file_uri};
use super::sink::decoded_duration;
use super::types::{BackendError, MediaInfo};

/// Metadata probe backed by `lofty`, falling back to the `rodio` decoder for
/// files whose container lofty cannot read a duration from.
#[derive(Clone)]
pub struct RodioProbe {
    registry: BlobRegistry,
    link_files: bool,
}

impl RodioProbe {
    /// `link_files` selects `file://` URIs over in-memory blobs.
    pub fn new(registry: BlobRegistry, link_files: bool) -> Self {
        Self {
            registry,
            link_files,
        }
    }
}

#[async_trait]
impl MediaProbe for RodioProbe {
    fn create_object_uri(&self, file: &SelectedFile, bytes: Arc<[u8]>) -> String {
        if self.link_files {
            return file_uri(&file.path);
        }
        match self.registry.insert(bytes, &file.mime) {
            Ok(uri) => uri,
            // Playback reports the failure if the file cannot be opened.
            Err(_) => file_uri(&file.path),
        }
    }

    async fn probe(&self, uri: &str, bytes: Arc<[u8]>) -> Result<MediaInfo, BackendError> {
        let uri = uri.to_string();
        tokio::task::spawn_blocking(move || read_media_info(&uri, bytes))
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?
    }
}

/// Read duration and artist from `bytes`.
pub(super) fn read_media_info(uri: &str, bytes: Arc<[u8]>) -> Result<MediaInfo, BackendError> {
    let mut artist = None;

    let tagged = Probe::new(Cursor::new(bytes.clone()))
        .guess_file_type()
        .map_err(|e| e.to_string())
        .and_then(|probe| probe.read().map_err(|e| e.to_string()));

    match tagged {
        Ok(tagged) => {
            artist = tagged
                .primary_tag()
                .or_else(|| tagged.first_tag())
                .and_then(|tag| tag.artist().map(|a| a.trim().to_string()))
                .filter(|a| !a.is_empty());

            let duration = tagged.properties().duration();
            if !duration.is_zero() {
                return Ok(MediaInfo {
                    duration_seconds: duration.as_secs_f64(),
                    artist,
                });
            }
        }
        Err(reason) => debug!(uri, %reason, "lofty could not read file, trying decoder"),
    }

    let duration = decoded_duration(uri, bytes)?;
    Ok(MediaInfo {
        duration_seconds: duration.map_or(0.0, |d| d.as_secs_f64()),
        artist,
    })
}
