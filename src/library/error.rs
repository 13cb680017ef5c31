use std::path::PathBuf;

use thiserror::Error;

/// Reasons an album's catalog is unavailable.
///
/// Callers in the playback path never propagate these: an unavailable
/// catalog degrades to an empty one.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
