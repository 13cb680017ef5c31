use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

use super::display::song_display_name;
use super::error::CatalogError;
use super::model::Track;
use super::scan::read_album_info;

/// Produces the ordered track list of an album.
pub trait CatalogLoader: Send + Sync {
    fn load(&self, album_id: &str) -> Result<Vec<Track>, CatalogError>;
}

/// Loads catalogs from `info.json` files under a library root.
pub struct FsCatalogLoader {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsCatalogLoader {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }
}

impl CatalogLoader for FsCatalogLoader {
    fn load(&self, album_id: &str) -> Result<Vec<Track>, CatalogError> {
        let info = read_album_info(&self.root.join(album_id))?;
        let tracks = info
            .songs
            .iter()
            .map(|song| {
                Track::new(
                    format!("{album_id}/{song}"),
                    song_display_name(song, &self.extensions),
                )
            })
            .collect();
        Ok(tracks)
    }
}

/// Load `album_id`, degrading an unavailable catalog to an empty one.
pub fn load_or_empty(loader: &dyn CatalogLoader, album_id: &str) -> Vec<Track> {
    match loader.load(album_id) {
        Ok(tracks) => {
            debug!(album = album_id, tracks = tracks.len(), "library: catalog loaded");
            tracks
        }
        Err(e) => {
            warn!(album = album_id, error = %e, "library: catalog unavailable");
            Vec::new()
        }
    }
}

/// Resolve a track url to a file path under `root`.
///
/// Each `/`-separated segment is percent-decoded.
pub fn track_path(root: &Path, url: &str) -> PathBuf {
    url.split('/')
        .filter(|seg| !seg.is_empty())
        .fold(root.to_path_buf(), |path, seg| {
            path.join(percent_decode_str(seg).decode_utf8_lossy().as_ref())
        })
}
