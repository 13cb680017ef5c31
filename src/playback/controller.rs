use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::debug;

use crate::library::Track;

use super::events::{Notification, TransportState};
use super::mute::MuteMemory;
use super::selection::resolve;
use super::session::{PlaybackSession, SessionPoll};

/// Drives the playback session from user commands.
///
/// Operations on an empty catalog are no-ops. Nothing in here fails: missing
/// data is a steady state, not an error.
pub struct TransportController {
    session: PlaybackSession,
    catalog: Vec<Track>,
    state: TransportState,
    // Set when the loaded track played out; hides the active index until the
    // next transport command.
    ended: bool,
    mute: MuteMemory,
    events: Sender<Notification>,
}

impl TransportController {
    pub fn new(session: PlaybackSession, events: Sender<Notification>) -> Self {
        Self {
            session,
            catalog: Vec::new(),
            state: TransportState::Idle,
            ended: false,
            mute: MuteMemory::default(),
            events,
        }
    }

    pub fn catalog(&self) -> &[Track] {
        &self.catalog
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Catalog entry matching the loaded track, hidden after the track ended.
    pub fn resolved_index(&self) -> Option<usize> {
        if self.ended {
            None
        } else {
            self.selection()
        }
    }

    /// The track the session currently holds, if it belongs to this catalog.
    pub fn current_track(&self) -> Option<&Track> {
        self.resolved_index().and_then(|i| self.catalog.get(i))
    }

    fn selection(&self) -> Option<usize> {
        resolve(&self.catalog, self.session.current_url())
    }

    fn emit(&self, notification: Notification) {
        // The receiving side may be gone during shutdown.
        let _ = self.events.send(notification);
    }

    fn publish_state(&self) {
        let index = self.resolved_index();
        debug!(?index, state = ?self.state, "transport: state changed");
        self.emit(Notification::PlaybackStateChanged {
            index,
            state: self.state,
        });
    }

    fn publish_position(&self) {
        self.emit(Notification::PositionChanged {
            current: self.session.position_seconds(),
            total: self.session.duration_seconds(),
        });
    }

    /// Load and play catalog entry `index`.
    fn start(&mut self, index: usize) {
        let Some(track) = self.catalog.get(index) else {
            return;
        };
        let url = track.url.clone();
        self.session.load(&url);
        self.session.play();
        self.state = TransportState::Playing;
        self.ended = false;
    }

    fn resume(&mut self) {
        if self.session.play() {
            self.state = TransportState::Playing;
            self.ended = false;
        }
    }

    fn pause(&mut self) {
        self.session.pause();
        self.state = TransportState::Paused;
    }

    /// Swap in a new catalog. The session keeps playing whatever it holds.
    pub fn replace_catalog(&mut self, tracks: Vec<Track>) {
        self.catalog = tracks;
        self.publish_state();
    }

    /// Primary play/pause control. With nothing loaded yet it starts the
    /// first track.
    pub fn toggle_current(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        match self.state {
            TransportState::Idle => self.start(0),
            TransportState::Playing => self.pause(),
            TransportState::Paused => self.resume(),
        }
        self.publish_state();
    }

    /// A track's own play/pause control: pauses that track if it is the one
    /// playing, otherwise switches to it.
    pub fn select_track(&mut self, index: usize) {
        if index >= self.catalog.len() {
            return;
        }
        if self.resolved_index() == Some(index) && self.state == TransportState::Playing {
            self.pause();
        } else {
            self.start(index);
        }
        self.publish_state();
    }

    /// Play the following track, wrapping to the first.
    pub fn next(&mut self) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let target = match self.selection() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.start(target);
        self.publish_state();
    }

    /// Play the preceding track, wrapping to the last. With nothing resolved
    /// it counts back from the first track, landing on the last one.
    pub fn previous(&mut self) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let target = match self.selection() {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.start(target);
        self.publish_state();
    }

    /// The loaded track played out. Playback stops there; nothing advances.
    pub fn on_playback_ended(&mut self) {
        self.state = TransportState::Paused;
        self.ended = true;
        self.emit(Notification::PlaybackEnded);
        self.publish_state();
    }

    pub fn set_volume_level(&mut self, level: f32) {
        self.session.set_volume(level);
        self.emit(Notification::VolumeChanged(self.session.volume()));
    }

    pub fn toggle_mute(&mut self) {
        let volume = self.mute.toggle(&mut self.session);
        self.emit(Notification::VolumeChanged(volume));
    }

    /// Jump to `fraction` of the loaded track; out-of-range input is clamped.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if self.session.current_url().is_none() {
            return;
        }
        self.session.seek(fraction);
        self.publish_position();
    }

    /// Poll the session and publish what changed. Called on every timer tick.
    pub fn tick(&mut self) {
        match self.session.poll() {
            SessionPoll::Empty => {}
            SessionPoll::Progress => self.publish_position(),
            SessionPoll::Ended => {
                self.publish_position();
                self.on_playback_ended();
            }
            SessionPoll::Failed => {
                self.state = TransportState::Idle;
                self.ended = false;
                self.publish_position();
                self.publish_state();
            }
        }
    }

    pub fn shutdown(&mut self, fade_out: Duration) {
        self.session.shutdown(fade_out);
    }
}
