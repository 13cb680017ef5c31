use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{AudioOutput, NullOutput, RodioOutput};
use crate::config::AudioSettings;
use crate::library::{CatalogLoader, CatalogWorker, FsCatalogLoader, discover_albums};
use crate::mpris::ControlCmd;
use crate::playback::{PlaybackSession, TransportController};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();
    logging::init(&settings.logging);
    if let Some(problem) = settings_problem {
        warn!(%problem, "config: falling back to defaults");
    }

    let root = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.library.root.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    info!(root = %root.display(), "cadenza: starting");

    let albums = discover_albums(&root, &settings.library);
    info!(count = albums.len(), "library: albums discovered");

    let output = open_output(&root, &settings.audio);
    let session = PlaybackSession::new(output, settings.audio.initial_volume);
    let (events_tx, events_rx) = mpsc::channel();
    let controller = TransportController::new(session, events_tx);
    let mut app = App::new(albums, controller, events_rx);

    let loader: Arc<dyn CatalogLoader> = Arc::new(FsCatalogLoader::new(
        root.clone(),
        settings.library.extensions.clone(),
    ));
    let mut worker = CatalogWorker::spawn(loader);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx, settings.audio.initial_volume);
    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut worker,
        &mpris,
        &control_rx,
    );

    app.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        warn!(error = %e, "cadenza: event loop failed");
    }
    info!("cadenza: bye");
    run_result
}

fn open_output(root: &Path, audio: &AudioSettings) -> Box<dyn AudioOutput> {
    match RodioOutput::new(root.to_path_buf(), audio.initial_volume) {
        Ok(output) => Box::new(output),
        Err(e) => {
            warn!(error = %e, "audio: no output device, playing silently");
            Box::new(NullOutput::realtime(root.to_path_buf()))
        }
    }
}
