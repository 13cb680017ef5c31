//! Application model: album browser, playlist cursor and the transport.
//!
//! `App` owns the [`TransportController`] and routes every user command to
//! it. Catalog loading happens elsewhere; the model only says which album it
//! wants and accepts the catalog once it arrives.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::debug;

use crate::library::{Album, Track};
use crate::playback::{Notification, TransportController, TransportState};

use super::reflector::Reflector;

/// Pane that receives cursor movement and activation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Albums,
    Tracks,
}

/// Commands coming from the keyboard or media keys.
#[derive(Clone, Debug, PartialEq)]
pub enum UserCommand {
    ActivatePrimaryTransport,
    ActivateTrackControl(usize),
    ActivateNext,
    ActivatePrevious,
    SetVolumeLevel(f32),
    ToggleMute,
    SeekToFraction(f64),
    SelectAlbum(String),
}

/// Work the caller has to do after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Fetch this album's catalog and hand it to [`App::apply_catalog`].
    LoadCatalog(String),
}

pub struct App {
    albums: Vec<Album>,
    album_cursor: usize,
    track_cursor: usize,
    focus: Focus,
    /// Album whose catalog is shown.
    current_album: Option<String>,
    /// Album requested but not loaded yet.
    pending_album: Option<String>,
    controller: TransportController,
    reflector: Reflector,
    notifications: Receiver<Notification>,
}

impl App {
    pub fn new(
        albums: Vec<Album>,
        controller: TransportController,
        notifications: Receiver<Notification>,
    ) -> Self {
        let reflector = Reflector::new(controller.session().volume());
        Self {
            albums,
            album_cursor: 0,
            track_cursor: 0,
            focus: Focus::Albums,
            current_album: None,
            pending_album: None,
            controller,
            reflector,
            notifications,
        }
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn tracks(&self) -> &[Track] {
        self.controller.catalog()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn album_cursor(&self) -> usize {
        self.album_cursor
    }

    pub fn track_cursor(&self) -> usize {
        self.track_cursor
    }

    pub fn reflector(&self) -> &Reflector {
        &self.reflector
    }

    pub fn current_album(&self) -> Option<&Album> {
        let id = self.current_album.as_deref()?;
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.pending_album.is_some()
    }

    /// Track the reflector marks as active.
    pub fn active_track(&self) -> Option<&Track> {
        self.reflector
            .active_index()
            .and_then(|i| self.tracks().get(i))
    }

    pub fn dispatch(&mut self, cmd: UserCommand) -> Effect {
        debug!(?cmd, "app: command");
        match cmd {
            UserCommand::ActivatePrimaryTransport => self.controller.toggle_current(),
            UserCommand::ActivateTrackControl(index) => self.controller.select_track(index),
            UserCommand::ActivateNext => self.controller.next(),
            UserCommand::ActivatePrevious => self.controller.previous(),
            UserCommand::SetVolumeLevel(level) => self.controller.set_volume_level(level),
            UserCommand::ToggleMute => self.controller.toggle_mute(),
            UserCommand::SeekToFraction(fraction) => self.controller.seek_to_fraction(fraction),
            UserCommand::SelectAlbum(id) => {
                self.pending_album = Some(id.clone());
                return Effect::LoadCatalog(id);
            }
        }
        self.sync_reflector();
        Effect::None
    }

    /// Install the catalog of `album_id` if it is still the album wanted.
    pub fn apply_catalog(&mut self, album_id: &str, tracks: Vec<Track>) {
        if self.pending_album.as_deref() != Some(album_id) {
            debug!(album = album_id, "app: ignoring catalog nobody asked for");
            return;
        }
        self.pending_album = None;
        self.current_album = Some(album_id.to_string());
        self.controller.replace_catalog(tracks);
        self.sync_reflector();
        self.track_cursor = self.reflector.active_index().unwrap_or(0);
        self.focus = Focus::Tracks;
    }

    /// Advance the transport clock.
    pub fn tick(&mut self) {
        self.controller.tick();
        self.sync_reflector();
    }

    /// Apply every pending notification. Returns whether the active index or
    /// transport state changed.
    pub fn sync_reflector(&mut self) -> bool {
        let before = (self.reflector.active_index(), self.reflector.state());
        while let Ok(n) = self.notifications.try_recv() {
            self.reflector.apply(&n);
        }
        let after = (self.reflector.active_index(), self.reflector.state());
        if before.0 != after.0 {
            // Follow playback with the playlist cursor.
            if let Some(i) = after.0 {
                self.track_cursor = i;
            }
        }
        before != after
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Albums => Focus::Tracks,
            Focus::Tracks => Focus::Albums,
        };
    }

    /// Move the focused pane's cursor by `delta`, wrapping at both ends.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let cursor = self.focused_cursor();
        let next = (cursor as isize + delta).rem_euclid(len as isize) as usize;
        self.set_focused_cursor(next);
    }

    pub fn cursor_to_top(&mut self) {
        if self.focused_len() > 0 {
            self.set_focused_cursor(0);
        }
    }

    pub fn cursor_to_bottom(&mut self) {
        let len = self.focused_len();
        if len > 0 {
            self.set_focused_cursor(len - 1);
        }
    }

    /// Put the playlist cursor back on the active track.
    pub fn cursor_to_active(&mut self) {
        if let Some(i) = self.reflector.active_index() {
            self.track_cursor = i;
        }
    }

    /// The command `enter` stands for in the focused pane.
    pub fn activation(&self) -> Option<UserCommand> {
        match self.focus {
            Focus::Albums => self
                .albums
                .get(self.album_cursor)
                .map(|a| UserCommand::SelectAlbum(a.id.clone())),
            Focus::Tracks => (self.track_cursor < self.tracks().len())
                .then_some(UserCommand::ActivateTrackControl(self.track_cursor)),
        }
    }

    /// Volume command for a relative change.
    pub fn volume_by(&self, delta: f32) -> UserCommand {
        UserCommand::SetVolumeLevel((self.reflector.volume() + delta).clamp(0.0, 1.0))
    }

    /// Seek command for a relative jump, as a share of the track.
    pub fn seek_by(&self, delta: f64) -> UserCommand {
        UserCommand::SeekToFraction((self.reflector.progress() + delta).clamp(0.0, 1.0))
    }

    /// Only the media keys care about this distinction: `Play` must not
    /// pause, `Pause` must not start anything.
    pub fn is_playing(&self) -> bool {
        self.reflector.state() == TransportState::Playing
    }

    pub fn shutdown(&mut self, fade_out: Duration) {
        self.controller.shutdown(fade_out);
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Focus::Albums => self.albums.len(),
            Focus::Tracks => self.tracks().len(),
        }
    }

    fn focused_cursor(&self) -> usize {
        match self.focus {
            Focus::Albums => self.album_cursor,
            Focus::Tracks => self.track_cursor,
        }
    }

    fn set_focused_cursor(&mut self, value: usize) {
        match self.focus {
            Focus::Albums => self.album_cursor = value,
            Focus::Tracks => self.track_cursor = value,
        }
    }
}
