use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::sink::{create_sink_at, probe_duration};
use super::types::{AudioCmd, OutputStatus, StatusHandle};

/// Everything the audio thread knows about the track it holds.
struct Deck {
    path: Option<PathBuf>,
    serial: u64,
    sink: Option<Sink>,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    duration: Option<Duration>,
    volume: f32,
    finished: bool,
    failed: bool,
}

impl Deck {
    fn new(volume: f32) -> Self {
        Self {
            path: None,
            serial: 0,
            sink: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            duration: None,
            volume,
            finished: false,
            failed: false,
        }
    }

    fn elapsed(&self) -> Duration {
        let elapsed = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.duration {
            Some(total) => elapsed.min(total),
            None => elapsed,
        }
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    /// Rebuild the sink at `start_at`, keeping the paused/playing state.
    fn rebuild_at(&mut self, stream: &rodio::OutputStream, start_at: Duration) {
        let Some(path) = self.path.clone() else {
            return;
        };
        self.stop_sink();

        match create_sink_at(stream, &path, start_at) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                if self.paused {
                    self.started_at = None;
                } else {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(sink);
                self.accumulated = start_at;
                self.finished = false;
                self.failed = false;
            }
            Err(e) => {
                warn!(error = %e, "audio: track could not be opened");
                self.paused = true;
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.failed = true;
            }
        }
    }

    fn load(&mut self, stream: &rodio::OutputStream, path: PathBuf, serial: u64) {
        self.stop_sink();
        debug!(path = %path.display(), serial, "audio: load");
        self.duration = probe_duration(&path);
        self.path = Some(path);
        self.serial = serial;
        self.paused = true;
        self.rebuild_at(stream, Duration::ZERO);
    }

    fn play(&mut self, stream: &rodio::OutputStream) {
        if self.path.is_none() || self.failed || !self.paused {
            return;
        }
        self.paused = false;
        if self.sink.is_none() || self.finished {
            let at = if self.finished { Duration::ZERO } else { self.accumulated };
            self.rebuild_at(stream, at);
            return;
        }
        if let Some(ref s) = self.sink {
            s.play();
        }
        self.started_at = Some(Instant::now());
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(ref s) = self.sink {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
    }

    fn check_finished(&mut self) {
        let drained = self.sink.as_ref().is_some_and(|s| s.empty());
        if !self.paused && drained {
            self.accumulated = self.elapsed();
            self.started_at = None;
            self.paused = true;
            self.finished = true;
            self.stop_sink();
        }
    }

    fn publish(&self, status: &StatusHandle) {
        if let Ok(mut info) = status.lock() {
            *info = OutputStatus {
                serial: self.serial,
                position: self.elapsed(),
                duration: self.duration,
                finished: self.finished,
                failed: self.failed,
            };
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64, from: f32) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

/// Spawn the thread that owns the output device.
///
/// The outcome of opening the device is reported once on `ready` before any
/// command is processed.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    status: StatusHandle,
    ready: SyncSender<Result<(), String>>,
    initial_volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => {
                let _ = ready.send(Ok(()));
                s
            }
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut deck = Deck::new(initial_volume);

        loop {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { path, serial } => deck.load(&stream, path, serial),
                    AudioCmd::Play => deck.play(&stream),
                    AudioCmd::Pause => deck.pause(),
                    AudioCmd::Seek(position) => {
                        if deck.path.is_some() && !deck.failed {
                            let position = match deck.duration {
                                Some(total) => position.min(total),
                                None => position,
                            };
                            deck.rebuild_at(&stream, position);
                        }
                    }
                    AudioCmd::SetVolume(v) => {
                        deck.volume = v;
                        if let Some(ref s) = deck.sink {
                            s.set_volume(v);
                        }
                    }
                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = deck.sink {
                            if !deck.paused {
                                fade_out_sink(s, fade_out_ms, deck.volume);
                            }
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            deck.check_finished();
            deck.publish(&status);
        }
    })
}
