use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::library::track_path;

use super::output::AudioOutput;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, OutputError, OutputStatus, StatusHandle};

/// Audio output backed by `rodio` on a dedicated thread.
///
/// Track urls are resolved against the library root before being handed to
/// the audio thread.
pub struct RodioOutput {
    root: PathBuf,
    tx: Sender<AudioCmd>,
    status: StatusHandle,
    serial: u64,
    join: Option<JoinHandle<()>>,
}

impl RodioOutput {
    /// Open the default output device.
    pub fn new(root: PathBuf, initial_volume: f32) -> Result<Self, OutputError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);
        let status: StatusHandle = Arc::new(Mutex::new(OutputStatus::default()));

        let audio_handle = spawn_audio_thread(rx, status.clone(), ready_tx, initial_volume);

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(msg)) => return Err(OutputError::Device(msg)),
            Err(_) => return Err(OutputError::Device("audio thread exited".to_string())),
        }

        Ok(Self {
            root,
            tx,
            status,
            serial: 0,
            join: Some(audio_handle),
        })
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(cmd = ?e.0, "audio: thread is gone, command dropped");
        }
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, url: &str) {
        self.serial += 1;
        let path = track_path(&self.root, url);
        self.send(AudioCmd::Load {
            path,
            serial: self.serial,
        });
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, level: f32) {
        self.send(AudioCmd::SetVolume(level));
    }

    fn poll(&mut self) -> OutputStatus {
        let Ok(info) = self.status.lock() else {
            return OutputStatus {
                serial: self.serial,
                ..OutputStatus::default()
            };
        };
        if info.serial == self.serial {
            info.clone()
        } else {
            // The audio thread has not picked up the latest load yet.
            OutputStatus {
                serial: self.serial,
                ..OutputStatus::default()
            }
        }
    }

    fn shutdown(&mut self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
