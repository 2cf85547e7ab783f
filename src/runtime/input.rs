use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::error;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Read terminal events on a dedicated thread and forward key presses and
/// resizes. The receiver closes if reading the terminal fails.
pub fn spawn_input_thread() -> UnboundedReceiver<Event> {
    let (tx, rx) = unbounded_channel();

    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    error!(error = %e, "terminal poll failed");
                    break;
                }
            }

            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    error!(error = %e, "terminal read failed");
                    break;
                }
            };

            let forward = match &ev {
                Event::Key(key) => key.kind == KeyEventKind::Press,
                Event::Resize(..) => true,
                _ => false,
            };
            if forward && tx.send(ev).is_err() {
                break;
            }
        }
    });

    rx
}
