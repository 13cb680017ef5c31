//! UI rendering for the terminal user interface.
//!
//! Everything playback-related on screen comes from the app's reflector;
//! this module never asks the transport what is going on.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::config::{ControlsSettings, UiSettings};
use crate::playback::TransportState;

const CONTROLS: &[(&str, &str)] = &[
    ("tab", "switch pane"),
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("zz", "cursor to playing"),
    ("enter", "open album / play track"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next song"),
    ("+/-", "volume"),
    ("m", "mute"),
    ("0-9", "jump to 0%..90%"),
    ("q", "quit"),
];

/// Render the controls help text, including the configured seek step.
fn controls_text(controls: &ControlsSettings) -> String {
    let seek = format!(
        "[H/L] seek -/+{}%",
        (controls.seek_step * 100.0).round() as u32
    );
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .chain(std::iter::once(seek))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format seconds as `m:ss`. Unknown, negative or non-finite input renders
/// as `00:00`.
pub fn format_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() && s >= 0.0 => {
            let whole = s.floor() as u64;
            format!("{}:{:02}", whole / 60, whole % 60)
        }
        _ => "00:00".to_string(),
    }
}

fn now_playing_text(app: &App) -> String {
    let reflector = app.reflector();
    if reflector.has_ended() && reflector.state() != TransportState::Playing {
        return "Finished".to_string();
    }
    let state = match reflector.state() {
        TransportState::Idle => return "Stopped".to_string(),
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
    };
    match (app.active_track(), app.current_album()) {
        (Some(track), Some(album)) => format!("{state}: {} • {}", track.display_name, album.title),
        (Some(track), None) => format!("{state}: {}", track.display_name),
        (None, _) => format!("{state}: a track from another album"),
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui: &UiSettings, controls: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    // Albums
    {
        let current = app.current_album().map(|a| a.id.as_str());
        let items: Vec<ListItem> = app
            .albums()
            .iter()
            .map(|album| {
                let mark = if current == Some(album.id.as_str()) { "♪ " } else { "  " };
                let mut lines = vec![Line::from(format!("{mark}{}", album.title))];
                if ui.show_album_description && !album.description.trim().is_empty() {
                    lines.push(Line::from(format!("    {}", album.description)).dim());
                }
                ListItem::new(Text::from(lines))
            })
            .collect();

        let focused = app.focus() == Focus::Albums;
        let list = List::new(items)
            .block(pane_block(" albums ".to_string(), focused))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if focused && !app.albums().is_empty() {
            state.select(Some(app.album_cursor()));
        }
        frame.render_stateful_widget(list, body[0], &mut state);
    }

    // Playlist
    {
        let reflector = app.reflector();
        let items: Vec<ListItem> = app
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, track)| ListItem::new(format!("{}{}", reflector.marker(i), track.display_name)))
            .collect();

        let title = if app.is_loading() {
            " loading... ".to_string()
        } else {
            match app.current_album() {
                Some(album) => format!(" {} ", album.title),
                None => " playlist ".to_string(),
            }
        };
        let focused = app.focus() == Focus::Tracks;
        let list = List::new(items)
            .block(pane_block(title, focused))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if focused && !app.tracks().is_empty() {
            state.select(Some(app.track_cursor()));
        }
        frame.render_stateful_widget(list, body[1], &mut state);
    }

    // Now playing
    let status = Paragraph::new(now_playing_text(app)).block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(" now playing "),
    );
    frame.render_widget(status, chunks[2]);

    // Progress and volume
    {
        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(chunks[3]);
        let reflector = app.reflector();

        let timer = format!(
            "{} / {}",
            format_time(Some(reflector.position())),
            format_time(reflector.duration())
        );
        let progress = Gauge::default()
            .block(Block::bordered().title(" progress "))
            .ratio(reflector.progress())
            .label(timer);
        frame.render_widget(progress, row[0]);

        let volume = f64::from(reflector.volume()).clamp(0.0, 1.0);
        let label = if reflector.is_muted() {
            "muted".to_string()
        } else {
            format!("{}%", (volume * 100.0).round() as u32)
        };
        let volume_gauge = Gauge::default()
            .block(Block::bordered().title(" volume "))
            .ratio(volume)
            .label(label);
        frame.render_widget(volume_gauge, row[1]);
    }

    let footer = Paragraph::new(controls_text(controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
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
