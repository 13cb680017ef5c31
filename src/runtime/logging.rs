use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{self, LoggingSettings};

/// Install the file logger. The terminal belongs to the UI, so records go to
/// a file; any setup failure is reported on stderr and logging stays off.
pub fn init(settings: &LoggingSettings) {
    let Some(path) = settings.file.clone().or_else(config::default_log_path) else {
        eprintln!("cadenza: no log file location (HOME unset), logging disabled");
        return;
    };

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("cadenza: cannot create {}: {e}", dir.display());
            return;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cadenza: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_env("CADENZA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("cadenza={}", settings.level)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("cadenza: logging already initialised: {e}");
    }
}
