//! Device-less audio output.
//!
//! Used when no output device can be opened, and by tests that need to
//! script what the "device" reports.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::library::track_path;

use super::output::AudioOutput;
use super::sink::probe_duration;
use super::types::OutputStatus;

#[derive(Debug, Default)]
struct NullState {
    url: Option<String>,
    serial: u64,
    playing: bool,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
    finished: bool,
    failed: bool,
    last_tick: Option<Instant>,
}

/// Silent output. In realtime mode the position follows the wall clock while
/// playing and track lengths are read from the files under the library root,
/// so tracks still end. Otherwise it only moves through a
/// [`NullOutputHandle`].
pub struct NullOutput {
    state: Arc<Mutex<NullState>>,
    /// Library root; `None` for scripted outputs.
    root: Option<PathBuf>,
}

/// Test-side view of a [`NullOutput`].
#[cfg(test)]
#[derive(Clone)]
pub struct NullOutputHandle {
    state: Arc<Mutex<NullState>>,
}

fn lock(state: &Arc<Mutex<NullState>>) -> MutexGuard<'_, NullState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl NullOutput {
    /// Output whose clock runs in real time, resolving urls against `root`.
    pub fn realtime(root: PathBuf) -> Self {
        Self {
            state: Arc::new(Mutex::new(NullState::default())),
            root: Some(root),
        }
    }

    /// Output driven entirely by the returned handle.
    #[cfg(test)]
    pub fn scripted() -> (Self, NullOutputHandle) {
        let state = Arc::new(Mutex::new(NullState::default()));
        let handle = NullOutputHandle {
            state: state.clone(),
        };
        (
            Self { state, root: None },
            handle,
        )
    }
}

impl AudioOutput for NullOutput {
    fn load(&mut self, url: &str) {
        let duration = self
            .root
            .as_ref()
            .and_then(|root| probe_duration(&track_path(root, url)));
        let mut s = lock(&self.state);
        s.serial += 1;
        s.url = Some(url.to_string());
        s.playing = false;
        s.position = Duration::ZERO;
        s.duration = duration;
        s.finished = false;
        s.failed = false;
        s.last_tick = None;
    }

    fn play(&mut self) {
        let mut s = lock(&self.state);
        if s.url.is_some() && !s.failed {
            if s.finished {
                s.finished = false;
                s.position = Duration::ZERO;
            }
            s.playing = true;
            s.last_tick = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        let mut s = lock(&self.state);
        s.playing = false;
        s.last_tick = None;
    }

    fn seek(&mut self, position: Duration) {
        let mut s = lock(&self.state);
        s.position = match s.duration {
            Some(total) => position.min(total),
            None => position,
        };
        s.finished = false;
    }

    fn set_volume(&mut self, level: f32) {
        lock(&self.state).volume = level;
    }

    fn poll(&mut self) -> OutputStatus {
        let mut s = lock(&self.state);
        if self.root.is_some() && s.playing {
            let now = Instant::now();
            if let Some(last) = s.last_tick.replace(now) {
                s.position += now - last;
            }
            if let Some(total) = s.duration {
                if s.position >= total {
                    s.position = total;
                    s.playing = false;
                    s.finished = true;
                }
            }
        }
        OutputStatus {
            serial: s.serial,
            position: s.position,
            duration: s.duration,
            finished: s.finished,
            failed: s.failed,
        }
    }
}

#[cfg(test)]
impl NullOutputHandle {
    pub fn set_duration(&self, duration: Duration) {
        lock(&self.state).duration = Some(duration);
    }

    /// Move the clock forward if the output is playing.
    pub fn advance(&self, by: Duration) {
        let mut s = lock(&self.state);
        if s.playing {
            s.position += by;
        }
    }

    /// Simulate the track playing to its end.
    pub fn finish(&self) {
        let mut s = lock(&self.state);
        if let Some(total) = s.duration {
            s.position = total;
        }
        s.playing = false;
        s.finished = true;
    }

    /// Simulate a decode failure of the loaded track.
    pub fn fail(&self) {
        let mut s = lock(&self.state);
        s.playing = false;
        s.failed = true;
    }

    pub fn url(&self) -> Option<String> {
        lock(&self.state).url.clone()
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.state).playing
    }

    pub fn position(&self) -> Duration {
        lock(&self.state).position
    }

    pub fn volume(&self) -> f32 {
        lock(&self.state).volume
    }

    pub fn loads(&self) -> u64 {
        lock(&self.state).serial
    }
}
