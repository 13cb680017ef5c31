use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{Action, App, Effect, KeyState, UserCommand};
use crate::config;
use crate::library::CatalogWorker;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// Longest time the loop waits for a key before doing housekeeping.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Main terminal event loop: catalog replies, media keys, the playback
/// clock, drawing and keyboard input. Returns `Ok(())` when shutdown is
/// requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    worker: &mut CatalogWorker,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_every = Duration::from_millis(settings.audio.tick_ms);
    let mut last_tick = Instant::now();
    let mut keys = KeyState::default();

    loop {
        if let Some(reply) = worker.poll() {
            debug!(album = %reply.album_id, tracks = reply.tracks.len(), "runtime: catalog ready");
            app.apply_catalog(&reply.album_id, reply.tracks);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, worker) {
                return Ok(());
            }
        }

        if last_tick.elapsed() >= tick_every {
            app.tick();
            last_tick = Instant::now();
        }

        app.sync_reflector();
        update_mpris(mpris, app);
        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        let wait = tick_every
            .saturating_sub(last_tick.elapsed())
            .min(INPUT_POLL);
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, worker, &mut keys) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn perform(effect: Effect, worker: &mut CatalogWorker) {
    if let Effect::LoadCatalog(album_id) = effect {
        worker.request(&album_id);
    }
}

/// Returns `true` when the app should quit.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App, worker: &mut CatalogWorker) -> bool {
    let command = match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play if app.is_playing() => return false,
        ControlCmd::Pause if !app.is_playing() => return false,
        ControlCmd::Play | ControlCmd::Pause | ControlCmd::PlayPause => {
            UserCommand::ActivatePrimaryTransport
        }
        ControlCmd::Next => UserCommand::ActivateNext,
        ControlCmd::Prev => UserCommand::ActivatePrevious,
    };
    perform(app.dispatch(command), worker);
    false
}

/// Returns `true` when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    worker: &mut CatalogWorker,
    keys: &mut KeyState,
) -> bool {
    match keys.map(key, app, &settings.controls) {
        Action::Quit => return true,
        Action::Command(cmd) => perform(app.dispatch(cmd), worker),
        Action::Activate => {
            if let Some(cmd) = app.activation() {
                perform(app.dispatch(cmd), worker);
            }
        }
        Action::ToggleFocus => app.toggle_focus(),
        Action::Move(delta) => app.move_cursor(delta),
        Action::Top => app.cursor_to_top(),
        Action::Bottom => app.cursor_to_bottom(),
        Action::CursorToActive => app.cursor_to_active(),
        Action::Nothing => {}
    }
    false
}
