//! Filename helpers for stored downloads

use std::path::{Component, Path};

/// Route prefix under which stored files are served
pub const DOWNLOAD_ROUTE_PREFIX: &str = "/download/";

/// Check that a client-supplied filename names a single path component
///
/// Rejects empty names, `.`/`..`, anything with a separator and NUL bytes so
/// a lookup can never leave the storage root.
pub fn is_safe_filename(filename: &str) -> bool {
    if filename.is_empty() || filename.len() > 255 || filename.contains('\0') {
        return false;
    }
    if filename.contains('/') || filename.contains('\\') {
        return false;
    }

    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Relative download URL for a stored file, keyed by its bare filename
pub fn download_url(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", DOWNLOAD_ROUTE_PREFIX, name)
}
