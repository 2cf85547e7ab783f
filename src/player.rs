//! Playback controller: turns user commands and backend events into backend
//! commands and a derived `ViewState`.

mod controller;
mod error;
mod state;

pub use controller::Controller;
pub use error::ControllerError;
pub use state::{PlayerEvent, PlaylistEntry, Status, ViewState};
