use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::error::CatalogError;
use super::model::{Album, AlbumInfo};

pub(super) const INFO_FILE: &str = "info.json";

/// Read and parse `info.json` inside `dir`.
pub fn read_album_info(dir: &Path) -> Result<AlbumInfo, CatalogError> {
    let path = dir.join(INFO_FILE);
    let raw = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse { path, source })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// `/`-separated id of `dir` relative to `root`.
fn album_id(root: &Path, dir: &Path) -> Option<String> {
    let rel = dir.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn album_from_dir(root: &Path, id: &str) -> Option<Album> {
    match read_album_info(&root.join(id)) {
        Ok(info) => Some(Album {
            id: id.to_string(),
            title: info.title,
            description: info.description,
        }),
        Err(e) => {
            warn!(album = id, error = %e, "library: skipping album");
            None
        }
    }
}

/// Find the albums available under `root`.
///
/// An explicit `settings.albums` list is used as-is, in order. Otherwise the
/// root is walked for folders holding an `info.json`, sorted by id. Albums
/// whose metadata cannot be read are skipped.
pub fn discover_albums(root: &Path, settings: &LibrarySettings) -> Vec<Album> {
    if !settings.albums.is_empty() {
        return settings
            .albums
            .iter()
            .map(|id| id.trim().trim_matches('/'))
            .filter(|id| !id.is_empty())
            .filter_map(|id| album_from_dir(root, id))
            .collect();
    }

    let walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .max_depth(settings.max_depth);

    let mut albums: Vec<Album> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.depth() > 0 && e.file_type().is_dir())
        .filter(|e| e.path().join(INFO_FILE).is_file())
        .filter_map(|e| album_id(root, e.path()))
        .filter_map(|id| album_from_dir(root, &id))
        .collect();

    albums.sort_by(|a, b| a.id.cmp(&b.id));
    debug!(count = albums.len(), root = %root.display(), "library: albums discovered");
    albums
}
