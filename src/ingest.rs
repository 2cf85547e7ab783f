//! Turns selected files into playlist tracks.
//!
//! Each file is read, registered with the probe under a playable URI and
//! probed for its metadata. Files are processed concurrently and report back
//! over a channel; a failure only affects its own file.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::audio::{BackendError, MediaProbe};
use crate::library::{SelectedFile, Track};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read metadata of {name}: {source}")]
    Metadata {
        name: String,
        #[source]
        source: BackendError,
    },
}

pub type IngestOutcome = Result<Track, IngestError>;

#[derive(Clone)]
pub struct Ingestor<P: MediaProbe> {
    probe: P,
}

impl<P: MediaProbe> Ingestor<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    pub async fn ingest(&self, file: SelectedFile) -> Result<Track, IngestError> {
        let bytes: Arc<[u8]> = tokio::fs::read(&file.path)
            .await
            .map(Arc::from)
            .map_err(|source| IngestError::Read {
                path: file.path.clone(),
                source,
            })?;
        debug!(path = %file.path.display(), size = bytes.len(), mime = %file.mime, "read file");

        // The file is read once; metadata comes from the same bytes.
        let uri = self.probe.create_object_uri(&file, bytes.clone());
        let info = self
            .probe
            .probe(&uri, bytes)
            .await
            .map_err(|source| IngestError::Metadata {
                name: file
                    .name
                    .clone()
                    .unwrap_or_else(|| file.path.display().to_string()),
                source,
            })?;

        let track = Track::new(
            file.name.as_deref(),
            uri,
            info.duration_seconds,
            info.artist.as_deref(),
        );
        info!(name = %track.name, duration = %track.duration_label, "ingested");
        Ok(track)
    }

    /// Ingest every file on its own task; outcomes arrive on `tx` in
    /// completion order.
    pub fn spawn_all(
        &self,
        files: Vec<SelectedFile>,
        tx: mpsc::Sender<IngestOutcome>,
    ) -> Vec<JoinHandle<()>> {
        files
            .into_iter()
            .map(|file| {
                let ingestor = self.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = ingestor.ingest(file).await;
                    if let Err(e) = &outcome {
                        warn!(error = %e, "ingestion failed");
                    }
                    if tx.send(outcome).await.is_err() {
                        debug!("ingestion receiver dropped");
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::tempdir;

    use super::*;
    use crate::audio::MediaInfo;
    use crate::library::{UNKNOWN_ARTIST, UNKNOWN_TITLE};

    /// Hands out sequential URIs and answers from the bytes' content:
    /// `bad` fails, `tagged` carries an artist.
    #[derive(Clone, Default)]
    struct FakeProbe {
        uris: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MediaProbe for FakeProbe {
        fn create_object_uri(&self, _file: &SelectedFile, _bytes: Arc<[u8]>) -> String {
            format!("fake:{}", self.uris.fetch_add(1, Ordering::SeqCst))
        }

        async fn probe(&self, uri: &str, bytes: Arc<[u8]>) -> Result<MediaInfo, BackendError> {
            match &bytes[..] {
                b"bad" => Err(BackendError::Decode {
                    uri: uri.to_string(),
                    reason: "not audio".into(),
                }),
                b"tagged" => Ok(MediaInfo {
                    duration_seconds: 61.0,
                    artist: Some("Someone".into()),
                }),
                _ => Ok(MediaInfo {
                    duration_seconds: 125.5,
                    artist: None,
                }),
            }
        }
    }

    fn write(dir: &std::path::Path, name: &str, bytes: &[u8]) -> SelectedFile {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        SelectedFile::from_path(path)
    }

    #[tokio::test]
    async fn ingest_builds_track_with_defaults() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "song.mp3", b"audio");
        let ingestor = Ingestor::new(FakeProbe::default());

        let track = ingestor.ingest(file).await.unwrap();
        assert_eq!(track.name, "song.mp3");
        assert_eq!(track.author, UNKNOWN_ARTIST);
        assert_eq!(track.duration_label, "02:05");
        assert_eq!(track.uri, "fake:0");
    }

    #[tokio::test]
    async fn ingest_uses_probed_artist() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "tagged.flac", b"tagged");
        let track = Ingestor::new(FakeProbe::default())
            .ingest(file)
            .await
            .unwrap();
        assert_eq!(track.author, "Someone");
        assert_eq!(track.duration_label, "01:01");
    }

    #[tokio::test]
    async fn ingest_falls_back_to_unknown_title() {
        let dir = tempdir().unwrap();
        let mut file = write(dir.path(), "x.mp3", b"audio");
        file.name = None;
        let track = Ingestor::new(FakeProbe::default())
            .ingest(file)
            .await
            .unwrap();
        assert_eq!(track.name, UNKNOWN_TITLE);
    }

    #[tokio::test]
    async fn unreadable_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let file = SelectedFile::from_path(dir.path().join("missing.mp3"));
        let err = Ingestor::new(FakeProbe::default())
            .ingest(file)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }

    #[tokio::test]
    async fn probe_failure_is_a_metadata_error() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "broken.mp3", b"bad");
        let err = Ingestor::new(FakeProbe::default())
            .ingest(file)
            .await
            .unwrap_err();
        match err {
            IngestError::Metadata { name, .. } => assert_eq!(name, "broken.mp3"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn spawn_all_reports_every_file_independently() {
        let dir = tempdir().unwrap();
        let files = vec![
            write(dir.path(), "a.mp3", b"audio"),
            write(dir.path(), "b.mp3", b"bad"),
            write(dir.path(), "c.mp3", b"tagged"),
        ];
        let (tx, mut rx) = mpsc::channel(8);
        let handles = Ingestor::new(FakeProbe::default()).spawn_all(files, tx);
        for h in handles {
            h.await.unwrap();
        }

        let mut names = Vec::new();
        let mut failures = 0;
        while let Ok(outcome) = rx.try_recv() {
            match outcome {
                Ok(track) => names.push(track.name),
                Err(_) => failures += 1,
            }
        }
        names.sort();
        assert_eq!(names, vec!["a.mp3", "c.mp3"]);
        assert_eq!(failures, 1);
    }
}
