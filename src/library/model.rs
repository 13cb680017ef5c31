use serde::Deserialize;

/// One playable entry of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Location relative to the library root; unique within a catalog.
    pub url: String,
    pub display_name: String,
}

impl Track {
    pub fn new(url: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            display_name: display_name.into(),
        }
    }
}

/// A discovered album folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Folder path relative to the library root, `/`-separated.
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Contents of an album's `info.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub songs: Vec<String>,
}
