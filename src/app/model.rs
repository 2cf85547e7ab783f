//! Application model: cursor, input prompt and status notice.
//!
//! Playback state lives in the controller; `App` only holds what the
//! terminal presentation adds on top of it.

use crate::player::{PlayerEvent, Status};

/// What key presses are currently interpreted as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a file or directory path to add.
    AddPath,
}

/// The presentation model.
pub struct App {
    /// Cursor row in the playlist.
    pub selected: usize,
    pub mode: InputMode,
    pub input: String,
    /// One-line message shown under the title (warnings, ingestion results).
    pub notice: Option<String>,
    /// Whether the cursor jumps to the track that starts playing.
    pub follow_playback: bool,
    pub should_quit: bool,
    len: usize,
}

impl App {
    pub fn new(len: usize, current_index: Option<usize>) -> Self {
        Self {
            selected: current_index.unwrap_or(0),
            mode: InputMode::Normal,
            input: String::new(),
            notice: None,
            follow_playback: true,
            should_quit: false,
            len,
        }
    }

    /// Keep the cursor range in sync with the playlist length.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        if self.len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % self.len;
        self.follow_playback = false;
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.len == 0 {
            return;
        }
        self.selected = (self.selected + self.len - 1) % self.len;
        self.follow_playback = false;
    }

    /// The row the user activated; following resumes from here.
    pub fn activate_selected(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.follow_playback = true;
        Some(self.selected)
    }

    pub fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = Some(msg.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn begin_add_path(&mut self) {
        self.mode = InputMode::AddPath;
        self.input.clear();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn cancel_input(&mut self) {
        self.mode = InputMode::Normal;
        self.input.clear();
    }

    /// Leave the prompt and return the typed path, if any.
    pub fn submit_input(&mut self) -> Option<String> {
        self.mode = InputMode::Normal;
        let path = std::mem::take(&mut self.input);
        let path = path.trim();
        (!path.is_empty()).then(|| path.to_string())
    }

    /// Apply a controller notification to the presentation state.
    pub fn observe(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::TrackChanged { index } => {
                if self.follow_playback && *index < self.len {
                    self.selected = *index;
                }
            }
            PlayerEvent::StatusChanged { to, .. } => {
                if *to == Status::Playing {
                    self.clear_notice();
                }
            }
            PlayerEvent::Warning(msg) => self.set_notice(msg.clone()),
        }
    }
}
