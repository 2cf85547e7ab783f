use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::audio::{BlobRegistry, RodioBackend, RodioProbe};
use crate::ingest::Ingestor;
use crate::player::Controller;

mod event_loop;
mod input;
mod logging;
mod settings;
mod startup;


/// Capacity of the channel carrying ingestion results back to the loop.
const INGEST_QUEUE: usize = 64;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();

    let data_dir = settings.data_dir();
    let log_problem = match data_dir.as_deref() {
        Some(dir) => logging::init(dir).err().map(|e| e.to_string()),
        None => Some("no data directory for the log file".to_string()),
    };
    if let Some(msg) = &settings_problem {
        warn!("{msg}");
    }
    info!("starting rondo");

    let catalog = startup::load_catalog(&settings);
    let registry = BlobRegistry::default();
    let (backend, backend_rx) = RodioBackend::new(
        registry.clone(),
        Duration::from_millis(settings.audio.tick_ms),
    );
    let controller = Controller::new(
        catalog,
        backend,
        settings.playback.clone(),
        settings.audio.start_muted,
    );
    let ingestor = Ingestor::new(RodioProbe::new(registry, settings.library.link_files));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let (ingest_tx, ingest_rx) = mpsc::channel(INGEST_QUEUE);

    rt.block_on(async {
        let mut session = event_loop::Session::new(controller, ingestor, ingest_tx, &settings);
        if let Some(msg) = settings_problem.or(log_problem) {
            session.app.set_notice(msg);
        }
        session.add_paths(&startup::cli_paths());

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let inbox = event_loop::Inbox {
            backend: backend_rx,
            ingest: ingest_rx,
            input: input::spawn_input_thread(),
        };
        let run_result = event_loop::run(&mut terminal, &settings, &mut session, inbox).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        info!("shutting down");
        run_result
    })
}
