//! Playlist data: track records, the persisted catalog and file selection.
//!
//! The `Catalog` owns the ordered list of `Track`s and writes it through a
//! `KvStore` after every mutation. `select_files` turns user supplied paths
//! into the files handed to the ingestion pipeline.

mod catalog;
mod display;
mod model;
mod scan;
mod store;

pub use catalog::*;
pub use display::*;
pub use model::*;
pub use scan::*;
pub use store::*;
