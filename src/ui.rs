//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the controller's `ViewState` and the presentation
//! model using `ratatui`. It never talks to the backend.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::config::{ControlsSettings, UiSettings};
use crate::player::{PlaylistEntry, Status, ViewState};

const CONTROLS: [(&str, &str); 8] = [
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("m", "mute"),
    ("a", "add path"),
    ("q", "quit"),
    // Seek is filled in from config.
    ("H/L", ""),
];

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| {
            if *k == "H/L" {
                format!("[H/L] seek -/+{seek_seconds}s")
            } else {
                format!("[{k}] {v}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn status_label(view: &ViewState) -> &'static str {
    match view.status {
        Status::Idle if view.current_index.is_none() => "Empty",
        Status::Idle => "Stopped",
        Status::Loading => "Loading",
        Status::Playing => "Playing",
        Status::Paused => "Paused",
        Status::Ended => "Ended",
    }
}

/// The status line: title, time, state and flags.
fn status_text(view: &ViewState) -> String {
    let mut parts: Vec<String> = Vec::new();
    match &view.title {
        Some(title) => parts.push(format!(
            "Song: {title} [{} / {}]",
            view.timer_label, view.duration_label
        )),
        None => parts.push("Add tracks with [a] or on the command line".to_string()),
    }
    parts.push(status_label(view).to_string());
    if view.is_muted {
        parts.push("Muted".to_string());
    }
    if !view.is_saved {
        parts.push("Not saved".to_string());
    }
    parts.join(" • ")
}

fn playlist_item(index: usize, entry: &PlaylistEntry, view: &ViewState) -> ListItem<'static> {
    let marker = match (view.current_index == Some(index), view.is_playing) {
        (true, true) => "♪ ",
        (true, false) => "· ",
        _ => "  ",
    };
    let mut spans = vec![
        Span::raw(marker),
        Span::raw(entry.name.clone()),
        Span::styled(
            format!("  {} · {}", entry.author, entry.duration_label),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if entry.session_only {
        spans.push(Span::styled(" (session)", Style::default().fg(Color::Yellow)));
    }
    ListItem::new(Line::from(spans))
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    view: &ViewState,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" rondo ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let mut status_lines = vec![Line::from(status_text(view))];
    if let Some(notice) = &app.notice {
        status_lines.push(Line::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }
    let status = Paragraph::new(status_lines)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Progress
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(view.progress_percent.clamp(0.0, 100.0) / 100.0)
        .label(format!("{} / {}", view.timer_label, view.duration_label));
    frame.render_widget(gauge, chunks[2]);

    // Playlist
    let items: Vec<ListItem> = view
        .playlist
        .iter()
        .enumerate()
        .map(|(i, entry)| playlist_item(i, entry, view))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" playlist ({}) ", view.playlist.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !view.playlist.is_empty() {
        state.select(Some(app.selected.min(view.playlist.len() - 1)));
    }
    frame.render_stateful_widget(list, chunks[3], &mut state);

    // Footer: controls, or the path prompt while typing.
    let (title, text) = match app.mode {
        InputMode::Normal => (" controls ", controls_text(controls_settings.seek_seconds)),
        InputMode::AddPath => (
            " add file or directory (enter to add, esc to cancel) ",
            format!("{}▏", app.input),
        ),
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
