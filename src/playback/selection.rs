use crate::library::Track;

/// Index of the first catalog entry whose url matches `current_url`.
///
/// Returns `None` when nothing is loaded or the loaded track is not part of
/// this catalog (for example after switching albums).
pub fn resolve(catalog: &[Track], current_url: Option<&str>) -> Option<usize> {
    let url = current_url?;
    catalog.iter().position(|t| t.url == url)
}
