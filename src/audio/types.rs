//! Audio-related small types and handles.
//!
//! Commands understood by the audio thread, the status it publishes and the
//! errors it can hit while opening a track.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current track. The serial tags the status published for it.
    Load { path: PathBuf, serial: u64 },
    /// Start or resume output of the loaded track.
    Play,
    /// Halt output, keeping the position.
    Pause,
    /// Jump to an absolute position in the loaded track.
    Seek(Duration),
    /// Set the output gain (0.0..=1.0).
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Playback status reported by an output for the track it currently holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputStatus {
    /// Load serial this status belongs to.
    pub serial: u64,
    pub position: Duration,
    /// `None` until the track's length is known.
    pub duration: Option<Duration>,
    /// The track played to its end.
    pub finished: bool,
    /// The track could not be opened or decoded.
    pub failed: bool,
}

pub type StatusHandle = Arc<Mutex<OutputStatus>>;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("no audio output device: {0}")]
    Device(String),
}
