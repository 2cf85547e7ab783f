//! Playable resource handles.
//!
//! A URI is either `file://<absolute path>`, read from disk whenever it is
//! needed, or `blob:rondo/<hex>`, naming bytes held in memory for the rest
//! of the session.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::types::BackendError;

pub const FILE_SCHEME: &str = "file://";
pub const BLOB_SCHEME: &str = "blob:rondo/";

struct Blob {
    bytes: Arc<[u8]>,
    mime: String,
}

/// Shared map of in-memory blobs. Clones share the same entries.
#[derive(Clone, Default)]
pub struct BlobRegistry {
    blobs: Arc<Mutex<HashMap<String, Blob>>>,
}

impl BlobRegistry {
    /// Keep `bytes` in memory and return a fresh `blob:` URI for them.
    pub fn insert(&self, bytes: Arc<[u8]>, mime: &str) -> Result<String, BackendError> {
        let uri = format!("{BLOB_SCHEME}{:016x}", rand::random::<u64>());
        let mut blobs = self.lock()?;
        blobs.insert(
            uri.clone(),
            Blob {
                bytes,
                mime: mime.to_string(),
            },
        );
        Ok(uri)
    }

    /// Resolve `uri` to its bytes.
    pub fn fetch(&self, uri: &str) -> Result<Arc<[u8]>, BackendError> {
        if let Some(path) = uri.strip_prefix(FILE_SCHEME) {
            return fs::read(path)
                .map(Arc::from)
                .map_err(|e| BackendError::Open {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                });
        }

        if uri.starts_with(BLOB_SCHEME) {
            let blobs = self.lock()?;
            let blob = blobs.get(uri).ok_or_else(|| BackendError::Open {
                uri: uri.to_string(),
                reason: "no such blob in this session".to_string(),
            })?;
            debug!(uri, mime = %blob.mime, size = blob.bytes.len(), "resolved blob");
            return Ok(blob.bytes.clone());
        }

        Err(BackendError::Open {
            uri: uri.to_string(),
            reason: "unsupported URI scheme".to_string(),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Blob>>, BackendError> {
        self.blobs
            .lock()
            .map_err(|_| BackendError::Unavailable("blob registry poisoned".to_string()))
    }
}

/// `file://` URI for `path`, made absolute when possible.
pub fn file_uri(path: &Path) -> String {
    let abs = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    format!("{FILE_SCHEME}{}", abs.display())
}
