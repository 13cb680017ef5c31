use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::audio::{NullOutput, NullOutputHandle};
use crate::config::ControlsSettings;
use crate::library::{Album, Track};
use crate::playback::{Notification, PlaybackSession, TransportController, TransportState};

fn album(id: &str) -> Album {
    Album {
        id: id.to_string(),
        title: id.to_uppercase(),
        description: String::new(),
    }
}

fn tracks(album: &str, names: &[&str]) -> Vec<Track> {
    names
        .iter()
        .map(|n| Track::new(format!("{album}/{n}.mp3"), *n))
        .collect()
}

fn app_with(albums: &[&str]) -> (App, NullOutputHandle) {
    let (output, handle) = NullOutput::scripted();
    let session = PlaybackSession::new(Box::new(output), 0.8);
    let (tx, rx) = mpsc::channel();
    let controller = TransportController::new(session, tx);
    let app = App::new(albums.iter().map(|a| album(a)).collect(), controller, rx);
    (app, handle)
}

fn open_album(app: &mut App, id: &str, names: &[&str]) {
    let effect = app.dispatch(UserCommand::SelectAlbum(id.to_string()));
    assert_eq!(effect, Effect::LoadCatalog(id.to_string()));
    app.apply_catalog(id, tracks(id, names));
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn reflector_marks_only_the_active_row() {
    let mut r = Reflector::new(1.0);
    assert_eq!(r.marker(0), "  ");

    r.apply(&Notification::PlaybackStateChanged {
        index: Some(1),
        state: TransportState::Playing,
    });
    assert_eq!(r.marker(0), "  ");
    assert_eq!(r.marker(1), "▶ ");

    r.apply(&Notification::PlaybackStateChanged {
        index: Some(1),
        state: TransportState::Paused,
    });
    assert_eq!(r.marker(1), "⏸ ");

    r.apply(&Notification::PlaybackStateChanged {
        index: None,
        state: TransportState::Playing,
    });
    assert!((0..3).all(|i| r.marker(i) == "  "));
}

#[test]
fn reflector_progress_and_mute() {
    let mut r = Reflector::new(0.5);
    assert_eq!(r.progress(), 0.0);

    r.apply(&Notification::PositionChanged {
        current: 30.0,
        total: Some(120.0),
    });
    assert_eq!(r.progress(), 0.25);

    r.apply(&Notification::PositionChanged {
        current: 5.0,
        total: None,
    });
    assert_eq!(r.progress(), 0.0);

    assert!(!r.is_muted());
    r.apply(&Notification::VolumeChanged(0.0));
    assert!(r.is_muted());
}

#[test]
fn reflector_remembers_track_end_until_playback_resumes() {
    let mut r = Reflector::new(1.0);
    r.apply(&Notification::PlaybackEnded);
    assert!(r.has_ended());
    r.apply(&Notification::PlaybackStateChanged {
        index: Some(0),
        state: TransportState::Playing,
    });
    assert!(!r.has_ended());
}

#[test]
fn selecting_an_album_requests_and_installs_its_catalog() {
    let (mut app, _handle) = app_with(&["first", "second"]);
    let effect = app.dispatch(UserCommand::SelectAlbum("second".into()));
    assert_eq!(effect, Effect::LoadCatalog("second".into()));
    assert!(app.is_loading());
    assert!(app.tracks().is_empty());

    app.apply_catalog("second", tracks("second", &["a", "b"]));
    assert!(!app.is_loading());
    assert_eq!(app.tracks().len(), 2);
    assert_eq!(app.current_album().map(|a| a.id.as_str()), Some("second"));
    assert_eq!(app.focus(), Focus::Tracks);
}

#[test]
fn newer_album_request_wins() {
    let (mut app, _handle) = app_with(&["first", "second"]);
    let _ = app.dispatch(UserCommand::SelectAlbum("first".into()));
    let _ = app.dispatch(UserCommand::SelectAlbum("second".into()));

    app.apply_catalog("first", tracks("first", &["x"]));
    assert!(app.tracks().is_empty());
    assert!(app.current_album().is_none());

    app.apply_catalog("second", tracks("second", &["a", "b"]));
    assert_eq!(app.tracks()[0].url, "second/a.mp3");
}

#[test]
fn transport_commands_reach_the_reflector() {
    let (mut app, handle) = app_with(&["one"]);
    open_album(&mut app, "one", &["a", "b", "c"]);

    let _ = app.dispatch(UserCommand::ActivatePrimaryTransport);
    assert_eq!(app.reflector().active_index(), Some(0));
    assert_eq!(app.reflector().state(), TransportState::Playing);
    assert_eq!(app.active_track().map(|t| t.display_name.as_str()), Some("a"));

    let _ = app.dispatch(UserCommand::ActivatePrevious);
    assert_eq!(app.reflector().active_index(), Some(2));
    assert_eq!(app.track_cursor(), 2);
    assert_eq!(handle.url().as_deref(), Some("one/c.mp3"));

    let _ = app.dispatch(UserCommand::ToggleMute);
    assert!(app.reflector().is_muted());
    let _ = app.dispatch(UserCommand::ToggleMute);
    assert_eq!(app.reflector().volume(), 0.8);
}

#[test]
fn switching_albums_keeps_audio_but_clears_the_marker() {
    let (mut app, handle) = app_with(&["one", "two"]);
    open_album(&mut app, "one", &["a", "b"]);
    let _ = app.dispatch(UserCommand::ActivateTrackControl(1));

    open_album(&mut app, "two", &["c", "d", "e"]);
    assert_eq!(app.reflector().active_index(), None);
    assert_eq!(app.reflector().state(), TransportState::Playing);
    assert!(app.active_track().is_none());
    assert_eq!(handle.url().as_deref(), Some("one/b.mp3"));
    assert_eq!(app.track_cursor(), 0);

    let _ = app.dispatch(UserCommand::ActivateNext);
    assert_eq!(app.active_track().map(|t| t.url.as_str()), Some("two/c.mp3"));
}

#[test]
fn coming_back_to_the_playing_album_finds_the_track_again() {
    let (mut app, _handle) = app_with(&["one", "two"]);
    open_album(&mut app, "one", &["a", "b"]);
    let _ = app.dispatch(UserCommand::ActivateTrackControl(1));
    open_album(&mut app, "two", &["c"]);

    open_album(&mut app, "one", &["a", "b"]);
    assert_eq!(app.reflector().active_index(), Some(1));
    assert_eq!(app.track_cursor(), 1);
}

#[test]
fn tick_publishes_position() {
    let (mut app, handle) = app_with(&["one"]);
    open_album(&mut app, "one", &["a"]);
    let _ = app.dispatch(UserCommand::ActivatePrimaryTransport);
    handle.set_duration(Duration::from_secs(100));
    handle.advance(Duration::from_secs(40));

    app.tick();
    assert_eq!(app.reflector().position(), 40.0);
    assert_eq!(app.reflector().duration(), Some(100.0));
    assert_eq!(app.reflector().progress(), 0.4);
}

#[test]
fn cursor_wraps_within_the_focused_pane() {
    let (mut app, _handle) = app_with(&["a", "b", "c"]);
    app.move_cursor(-1);
    assert_eq!(app.album_cursor(), 2);
    app.move_cursor(1);
    assert_eq!(app.album_cursor(), 0);

    app.toggle_focus();
    app.move_cursor(1);
    assert_eq!(app.track_cursor(), 0);
    assert_eq!(app.album_cursor(), 0);
}

#[test]
fn activation_depends_on_focus() {
    let (mut app, _handle) = app_with(&["one", "two"]);
    app.move_cursor(1);
    assert_eq!(app.activation(), Some(UserCommand::SelectAlbum("two".into())));

    app.toggle_focus();
    assert_eq!(app.activation(), None);

    open_album(&mut app, "two", &["a", "b"]);
    app.move_cursor(1);
    assert_eq!(app.activation(), Some(UserCommand::ActivateTrackControl(1)));
}

#[test]
fn relative_volume_is_clamped() {
    let (app, _handle) = app_with(&[]);
    assert_eq!(app.volume_by(0.5), UserCommand::SetVolumeLevel(1.0));
    assert_eq!(app.volume_by(-2.0), UserCommand::SetVolumeLevel(0.0));
}

#[test]
fn keys_map_to_commands() {
    let (app, _handle) = app_with(&["one"]);
    let controls = ControlsSettings::default();
    let mut keys = KeyState::default();

    assert_eq!(keys.map(key(KeyCode::Char('q')), &app, &controls), Action::Quit);
    assert_eq!(keys.map(key(KeyCode::Tab), &app, &controls), Action::ToggleFocus);
    assert_eq!(
        keys.map(key(KeyCode::Char(' ')), &app, &controls),
        Action::Command(UserCommand::ActivatePrimaryTransport)
    );
    assert_eq!(
        keys.map(key(KeyCode::Char('7')), &app, &controls),
        Action::Command(UserCommand::SeekToFraction(0.7))
    );
    assert_eq!(
        keys.map(key(KeyCode::Char('L')), &app, &controls),
        Action::Command(UserCommand::SeekToFraction(0.05))
    );
    assert_eq!(
        keys.map(key(KeyCode::Char('H')), &app, &controls),
        Action::Command(UserCommand::SeekToFraction(0.0))
    );
}

#[test]
fn double_key_prefixes() {
    let (app, _handle) = app_with(&[]);
    let controls = ControlsSettings::default();
    let mut keys = KeyState::default();

    assert_eq!(keys.map(key(KeyCode::Char('g')), &app, &controls), Action::Nothing);
    assert_eq!(keys.map(key(KeyCode::Char('g')), &app, &controls), Action::Top);

    assert_eq!(keys.map(key(KeyCode::Char('g')), &app, &controls), Action::Nothing);
    assert_eq!(keys.map(key(KeyCode::Char('j')), &app, &controls), Action::Move(1));
    assert_eq!(keys.map(key(KeyCode::Char('g')), &app, &controls), Action::Nothing);

    assert_eq!(keys.map(key(KeyCode::Char('z')), &app, &controls), Action::Nothing);
    assert_eq!(keys.map(key(KeyCode::Char('z')), &app, &controls), Action::CursorToActive);
}
