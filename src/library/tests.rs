use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tempfile::tempdir;

use super::display::song_display_name;
use super::error::CatalogError;
use super::loader::load_or_empty;
use super::worker::CatalogReply;
use super::*;
use crate::config::LibrarySettings;

fn exts() -> Vec<String> {
    LibrarySettings::default().extensions
}

fn write_album(root: &Path, id: &str, title: &str, songs: &[&str]) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    let info = serde_json::json!({
        "title": title,
        "description": format!("{title} description"),
        "songs": songs,
    });
    fs::write(dir.join("info.json"), info.to_string()).unwrap();
}

#[test]
fn song_display_name_decodes_and_strips_known_extensions() {
    assert_eq!(song_display_name("Brown%20Munde.mp3", &exts()), "Brown Munde");
    assert_eq!(song_display_name("songs/x/Track.WEBM", &exts()), "Track");
    assert_eq!(song_display_name("  padded .mp3", &exts()), "padded");
    assert_eq!(song_display_name("notes.txt", &exts()), "notes.txt");
    assert_eq!(song_display_name("no-extension", &exts()), "no-extension");
}

#[test]
fn track_path_decodes_each_segment() {
    let p = track_path(Path::new("/music"), "songs/shubh/Still%20Rollin.mp3");
    assert_eq!(p, PathBuf::from("/music/songs/shubh/Still Rollin.mp3"));
}

#[test]
fn fs_loader_builds_tracks_in_listed_order() {
    let dir = tempdir().unwrap();
    write_album(dir.path(), "songs/shubh", "Shubh", &["b.mp3", "a%20b.mp3", "c.webm"]);

    let loader = FsCatalogLoader::new(dir.path(), exts());
    let tracks = loader.load("songs/shubh").unwrap();

    assert_eq!(
        tracks,
        vec![
            Track::new("songs/shubh/b.mp3", "b"),
            Track::new("songs/shubh/a%20b.mp3", "a b"),
            Track::new("songs/shubh/c.webm", "c"),
        ]
    );
}

#[test]
fn fs_loader_reports_missing_and_malformed_info() {
    let dir = tempdir().unwrap();
    let loader = FsCatalogLoader::new(dir.path(), exts());

    assert!(matches!(loader.load("nope"), Err(CatalogError::Io { .. })));

    fs::create_dir_all(dir.path().join("broken")).unwrap();
    fs::write(dir.path().join("broken/info.json"), "{ not json").unwrap();
    assert!(matches!(loader.load("broken"), Err(CatalogError::Parse { .. })));
}

#[test]
fn load_or_empty_degrades_unavailable_catalog() {
    let dir = tempdir().unwrap();
    let loader = FsCatalogLoader::new(dir.path(), exts());
    assert!(load_or_empty(&loader, "missing").is_empty());
}

#[test]
fn discover_walks_for_info_json_and_sorts_by_id() {
    let dir = tempdir().unwrap();
    write_album(dir.path(), "songs/talwinder", "Talwinder", &["x.mp3"]);
    write_album(dir.path(), "songs/imranKhan", "Imran Khan", &["y.mp3"]);
    fs::create_dir_all(dir.path().join("songs/empty")).unwrap();
    fs::create_dir_all(dir.path().join("songs/bad")).unwrap();
    fs::write(dir.path().join("songs/bad/info.json"), "[]").unwrap();

    let settings = LibrarySettings::default();
    let albums = discover_albums(dir.path(), &settings);

    let ids: Vec<&str> = albums.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["songs/imranKhan", "songs/talwinder"]);
    assert_eq!(albums[0].title, "Imran Khan");
    assert_eq!(albums[0].description, "Imran Khan description");
}

#[test]
fn discover_respects_max_depth_and_hidden() {
    let dir = tempdir().unwrap();
    write_album(dir.path(), "a/b/c", "Deep", &[]);
    write_album(dir.path(), ".hidden", "Hidden", &[]);
    write_album(dir.path(), "top", "Top", &[]);

    let settings = LibrarySettings::default();
    let ids: Vec<String> = discover_albums(dir.path(), &settings)
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec!["top".to_string()]);

    let settings = LibrarySettings {
        max_depth: 3,
        include_hidden: true,
        ..LibrarySettings::default()
    };
    let ids: Vec<String> = discover_albums(dir.path(), &settings)
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![".hidden".to_string(), "a/b/c".to_string(), "top".to_string()]);
}

#[test]
fn explicit_album_list_keeps_order_and_skips_unreadable() {
    let dir = tempdir().unwrap();
    write_album(dir.path(), "songs/shubh", "Shubh", &[]);
    write_album(dir.path(), "songs/imranKhan", "Imran Khan", &[]);

    let settings = LibrarySettings {
        albums: vec![
            "songs/shubh".into(),
            "songs/missing".into(),
            "/songs/imranKhan/".into(),
        ],
        ..LibrarySettings::default()
    };
    let ids: Vec<String> = discover_albums(dir.path(), &settings)
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec!["songs/shubh".to_string(), "songs/imranKhan".to_string()]);
}

struct SlowLoader;

impl CatalogLoader for SlowLoader {
    fn load(&self, album_id: &str) -> Result<Vec<Track>, CatalogError> {
        if album_id == "slow" {
            thread::sleep(Duration::from_millis(50));
        }
        Ok(vec![Track::new(format!("{album_id}/1.mp3"), "1")])
    }
}

fn wait_for(worker: &mut CatalogWorker) -> Option<CatalogReply> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(reply) = worker.poll() {
            return Some(reply);
        }
        thread::sleep(Duration::from_millis(5));
    }
    None
}

#[test]
fn worker_hands_out_only_the_newest_request() {
    let mut worker = CatalogWorker::spawn(Arc::new(SlowLoader));
    worker.request("slow");
    let newest = worker.request("fast");

    let reply = wait_for(&mut worker).expect("reply");
    assert_eq!(reply.generation, newest);
    assert_eq!(reply.album_id, "fast");
    assert_eq!(reply.tracks, vec![Track::new("fast/1.mp3", "1")]);

    // The superseded reply never surfaces afterwards.
    thread::sleep(Duration::from_millis(20));
    assert!(worker.poll().is_none());
}
