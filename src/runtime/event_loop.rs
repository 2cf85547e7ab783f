use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::app::{App, InputMode};
use crate::audio::{BackendEvent, MediaBackend, MediaProbe};
use crate::config;
use crate::ingest::{IngestOutcome, Ingestor};
use crate::library::select_files;
use crate::player::{Controller, ControllerError};
use crate::runtime::startup::expand_home;
use crate::ui;

/// A user command decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePlay,
    Next,
    Previous,
    SeekForward,
    SeekBackward,
    ToggleMute,
    CursorDown,
    CursorUp,
    Select,
    BeginAddPath,
    InputChar(char),
    InputBackspace,
    SubmitInput,
    CancelInput,
    Quit,
}

/// Translate a key press in `mode` into an action.
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::AddPath => match key.code {
            KeyCode::Esc => Some(Action::CancelInput),
            KeyCode::Enter => Some(Action::SubmitInput),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Char(c) if !c.is_control() => Some(Action::InputChar(c)),
            _ => None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::TogglePlay),
            KeyCode::Char('l') => Some(Action::Next),
            KeyCode::Char('h') => Some(Action::Previous),
            KeyCode::Char('L') => Some(Action::SeekForward),
            KeyCode::Char('H') => Some(Action::SeekBackward),
            KeyCode::Char('m') => Some(Action::ToggleMute),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::CursorDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::CursorUp),
            KeyCode::Enter => Some(Action::Select),
            KeyCode::Char('a') => Some(Action::BeginAddPath),
            _ => None,
        },
    }
}

/// Everything the event loop dispatches into: the controller, the
/// presentation model and the ingestion pipeline.
pub struct Session<B: MediaBackend, P: MediaProbe> {
    pub app: App,
    pub controller: Controller<B>,
    ingestor: Ingestor<P>,
    ingest_tx: mpsc::Sender<IngestOutcome>,
    library: config::LibrarySettings,
    seek_seconds: f64,
}

impl<B: MediaBackend, P: MediaProbe> Session<B, P> {
    pub fn new(
        controller: Controller<B>,
        ingestor: Ingestor<P>,
        ingest_tx: mpsc::Sender<IngestOutcome>,
        settings: &config::Settings,
    ) -> Self {
        let app = App::new(controller.catalog().len(), controller.current_index());
        Self {
            app,
            controller,
            ingestor,
            ingest_tx,
            library: settings.library.clone(),
            seek_seconds: settings.controls.seek_seconds as f64,
        }
    }

    pub fn apply(&mut self, action: Action) {
        let result = match action {
            Action::TogglePlay => self.controller.toggle_play(),
            Action::Next => self.controller.next(),
            Action::Previous => self.controller.previous(),
            Action::SeekForward => {
                self.controller.seek_relative(self.seek_seconds);
                Ok(())
            }
            Action::SeekBackward => {
                self.controller.seek_relative(-self.seek_seconds);
                Ok(())
            }
            Action::ToggleMute => {
                self.controller.toggle_mute();
                Ok(())
            }
            Action::CursorDown => {
                self.app.next();
                Ok(())
            }
            Action::CursorUp => {
                self.app.prev();
                Ok(())
            }
            Action::Select => match self.app.activate_selected() {
                Some(index) => self.controller.select_track(index),
                None => Ok(()),
            },
            Action::BeginAddPath => {
                self.app.begin_add_path();
                Ok(())
            }
            Action::InputChar(c) => {
                self.app.push_input(c);
                Ok(())
            }
            Action::InputBackspace => {
                self.app.pop_input();
                Ok(())
            }
            Action::CancelInput => {
                self.app.cancel_input();
                Ok(())
            }
            Action::SubmitInput => {
                if let Some(input) = self.app.submit_input() {
                    self.add_paths(&[expand_home(&input)]);
                }
                Ok(())
            }
            Action::Quit => {
                self.app.should_quit = true;
                Ok(())
            }
        };

        match result {
            // Already queued as a warning by the controller.
            Err(ControllerError::InsufficientTracks { .. }) | Ok(()) => {}
            Err(e) => self.app.set_notice(e.to_string()),
        }
        self.sync();
    }

    /// Start ingesting every audio file under `paths`.
    pub fn add_paths(&mut self, paths: &[PathBuf]) {
        let files = select_files(paths, &self.library);
        if files.is_empty() {
            if !paths.is_empty() {
                self.app.set_notice("no audio files found");
            }
            return;
        }
        info!(count = files.len(), "adding files");
        self.app.set_notice(format!("adding {} file(s)…", files.len()));
        self.ingestor.spawn_all(files, self.ingest_tx.clone());
    }

    pub fn on_ingested(&mut self, outcome: IngestOutcome) {
        match outcome {
            Ok(track) => {
                self.app.clear_notice();
                self.controller.on_track_ingested(track);
            }
            Err(e) => self.app.set_notice(e.to_string()),
        }
        self.sync();
    }

    pub fn on_backend_event(&mut self, event: BackendEvent) {
        self.controller.handle_backend_event(event);
        self.sync();
    }

    fn sync(&mut self) {
        self.app.set_len(self.controller.catalog().len());
        for event in self.controller.drain_events() {
            debug!(?event, "player event");
            self.app.observe(&event);
        }
    }
}

/// Channels feeding the event loop.
pub struct Inbox {
    pub backend: mpsc::UnboundedReceiver<BackendEvent>,
    pub ingest: mpsc::Receiver<IngestOutcome>,
    pub input: mpsc::UnboundedReceiver<Event>,
}

/// Main terminal event loop: dispatches input, backend events and ingestion
/// results one at a time and redraws after each. Returns when the user quits
/// or terminal input ends.
pub async fn run<B: MediaBackend, P: MediaProbe>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    session: &mut Session<B, P>,
    mut inbox: Inbox,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut redraw = tokio::time::interval(Duration::from_millis(settings.ui.redraw_ms));
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let view = session.controller.view();
        terminal.draw(|f| ui::draw(f, &session.app, &view, &settings.ui, &settings.controls))?;

        if session.app.should_quit {
            break;
        }

        tokio::select! {
            Some(event) = inbox.backend.recv() => session.on_backend_event(event),
            Some(outcome) = inbox.ingest.recv() => session.on_ingested(outcome),
            input = inbox.input.recv() => match input {
                Some(Event::Key(key)) => {
                    if let Some(action) = map_key(key, session.app.mode) {
                        session.apply(action);
                    }
                }
                Some(_) => {}
                None => break,
            },
            _ = redraw.tick() => {}
        }
    }

    Ok(())
}
