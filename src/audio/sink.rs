//! Utilities for creating `rodio` sinks from resolved resource bytes.
//!
//! The helper here encapsulates decoding and preparing a paused `Sink` at
//! the requested start position.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::BackendError;

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
///
/// Also returns the total duration when the decoder knows it.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    uri: &str,
    bytes: Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), BackendError> {
    let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| BackendError::Decode {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

/// Duration as reported by the decoder, without creating a sink.
pub(super) fn decoded_duration(uri: &str, bytes: Arc<[u8]>) -> Result<Option<Duration>, BackendError> {
    let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| BackendError::Decode {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    Ok(decoder.total_duration())
}
