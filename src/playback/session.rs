use std::time::Duration;

use tracing::{debug, warn};

use crate::audio::AudioOutput;

/// What a [`PlaybackSession::poll`] observed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionPoll {
    /// No track is loaded.
    Empty,
    /// Position and duration were refreshed.
    Progress,
    /// The loaded track played to its end. The session is paused at zero.
    Ended,
    /// The output could not play the loaded track. The session is empty again.
    Failed,
}

/// The one shared playback session.
///
/// Wraps an [`AudioOutput`] and mirrors its state. Position and volume are
/// always kept inside their valid ranges.
pub struct PlaybackSession {
    output: Box<dyn AudioOutput>,
    current_url: Option<String>,
    paused: bool,
    position: f64,
    duration: Option<f64>,
    volume: f32,
}

impl PlaybackSession {
    pub fn new(mut output: Box<dyn AudioOutput>, volume: f32) -> Self {
        let volume = clamp_volume(volume);
        output.set_volume(volume);
        Self {
            output,
            current_url: None,
            paused: true,
            position: 0.0,
            duration: None,
            volume,
        }
    }

    /// `None` until a track has been loaded.
    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn position_seconds(&self) -> f64 {
        self.position
    }

    /// `None` while the output has not reported a length yet.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Load `url` paused at zero. Supersedes any previous load.
    pub fn load(&mut self, url: &str) {
        debug!(url, "session: load");
        self.output.load(url);
        self.current_url = Some(url.to_string());
        self.paused = true;
        self.position = 0.0;
        self.duration = None;
    }

    /// Resume output from the current position. Returns `false`, doing
    /// nothing, when no track is loaded.
    pub fn play(&mut self) -> bool {
        if self.current_url.is_none() {
            return false;
        }
        self.output.play();
        self.paused = false;
        true
    }

    pub fn pause(&mut self) {
        if self.current_url.is_some() {
            self.output.pause();
        }
        self.paused = true;
    }

    /// Jump to `fraction` of the track, clamped to `0.0..=1.0`. Lands on zero
    /// while the duration is unknown.
    pub fn seek(&mut self, fraction: f64) {
        if self.current_url.is_none() {
            return;
        }
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.position = match self.duration {
            Some(total) => fraction * total,
            None => 0.0,
        };
        self.output.seek(Duration::from_secs_f64(self.position));
    }

    /// Set the output level, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, level: f32) {
        self.volume = clamp_volume(level);
        self.output.set_volume(self.volume);
    }

    /// Refresh position and duration from the output.
    pub fn poll(&mut self) -> SessionPoll {
        if self.current_url.is_none() {
            return SessionPoll::Empty;
        }

        let status = self.output.poll();
        if status.failed {
            warn!(url = self.current_url.as_deref(), "session: track cannot be played");
            self.unload();
            return SessionPoll::Failed;
        }

        if let Some(total) = status.duration {
            self.duration = Some(total.as_secs_f64());
        }
        self.position = status.position.as_secs_f64();

        if status.finished && !self.paused {
            self.paused = true;
            self.position = 0.0;
            // Rewind so the next play() starts the track over.
            self.output.seek(Duration::ZERO);
            return SessionPoll::Ended;
        }
        SessionPoll::Progress
    }

    /// Forget the loaded track, back to the bootstrap state.
    fn unload(&mut self) {
        self.output.pause();
        self.current_url = None;
        self.paused = true;
        self.position = 0.0;
        self.duration = None;
    }

    pub fn shutdown(&mut self, fade_out: Duration) {
        self.output.shutdown(fade_out);
    }
}

fn clamp_volume(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
