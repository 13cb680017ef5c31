//! Album discovery and track catalogs.
//!
//! An album is a folder under the library root holding an `info.json` that
//! lists its songs. Loading an album yields the ordered catalog the playback
//! core works on.

mod display;
mod error;
mod loader;
mod model;
mod scan;
mod worker;

pub use loader::{CatalogLoader, FsCatalogLoader, track_path};
pub use model::{Album, Track};
pub use scan::discover_albums;
pub use worker::CatalogWorker;

#[cfg(test)]
mod tests;
