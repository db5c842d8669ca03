use std::io::ErrorKind;
use std::path::Path;

/// Removes `path` if it is a file. A missing file is not an error, and any
/// other failure is only logged: the caller recreates the file right after.
pub fn remove_file_if_exists(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Removed stale file {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove {}: {e}", path.display()),
    }
}

/// Recursively removes the directory at `path`, ignoring a missing directory.
pub fn remove_dir_if_exists(path: &Path) {
    match std::fs::remove_dir_all(path) {
        Ok(()) => log::debug!("Removed stale directory {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove {}: {e}", path.display()),
    }
}

/// Creates `path` and its parents. Fails if `path` exists but is not a directory.
pub fn ensure_dir_exists(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
