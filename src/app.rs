//! Application module: exposes the presentation model used by the TUI and
//! runtime.
//!
//! The `App` model lives in `app::model` and holds the playlist cursor, the
//! add-path prompt and the status notice.

mod model;

pub use model::*;
