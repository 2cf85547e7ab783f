//! Media backend: the traits the controller and ingestion pipeline talk to,
//! and their `rodio` implementation running on a dedicated audio thread.

mod backend;
mod player;
mod probe;
mod registry;
mod sink;
mod thread;
mod types;

pub use backend::{MediaBackend, MediaProbe};
pub use player::RodioBackend;
pub use probe::RodioProbe;
pub use registry::{BLOB_SCHEME, BlobRegistry};
pub use types::{BackendError, BackendEvent, BackendEventKind, Generation, MediaInfo};

#[cfg(test)]
mod tests;
