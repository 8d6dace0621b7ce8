//! File removal.
//!
//! Both functions return `Ok(true)` when a file was removed and `Ok(false)`
//! when there was nothing to remove. Errors keep the raw OS error so callers
//! can match on it.
//!
//! `remove_nfs_safe` renames the file to a unique sibling before unlinking
//! it. Another client holding the old name open then keeps a valid handle
//! (NFS "silly rename" happens on the private name), and the public name is
//! free for reuse immediately.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::LogFailure;
use crate::platform::temp::unique_sibling_name;

/// Remove `path` (non-directory) with a direct unlink.
///
/// Only for files that are never shared over a network filesystem.
pub fn remove(path: &Path, log_failure: LogFailure) -> io::Result<bool> {
    let result = unlink(path);
    report(path, &result, log_failure);
    result
}

/// Remove `path` (non-directory) using rename-then-unlink.
pub fn remove_nfs_safe(path: &Path, log_failure: LogFailure) -> io::Result<bool> {
    let result = rename_then_unlink(path);
    report(path, &result, log_failure);
    result
}

fn unlink(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn rename_then_unlink(path: &Path) -> io::Result<bool> {
    // Refuse directories up front: rename would happily move them.
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{} is a directory", path.display()),
            ));
        }
        _ => {}
    }

    let tmp = unique_sibling_name(path, "rm.tmp");
    match fs::rename(path, &tmp) {
        Ok(()) => {}
        // Removed by someone else in the meantime.
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    }
    match fs::remove_file(&tmp) {
        Ok(()) => Ok(true),
        // Our private name vanished; the public name is gone either way.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e),
    }
}

/// Diagnostic side channel. Never alters the result.
fn report(path: &Path, result: &io::Result<bool>, log_failure: LogFailure) {
    match result {
        Ok(true) => debug!(path = %path.display(), "Removed file"),
        Ok(false) => {}
        Err(e) => {
            if log_failure == LogFailure::Yes {
                warn!(path = %path.display(), error = %e, "Removal failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn remove_existing_and_missing() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("f");
        fs::write(&p, b"x").unwrap();
        assert!(remove(&p, LogFailure::Yes).unwrap());
        assert!(!p.exists());
        assert!(!remove(&p, LogFailure::Yes).unwrap());
    }

    #[test]
    fn nfs_safe_existing_and_missing() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("f");
        fs::write(&p, b"x").unwrap();
        assert!(remove_nfs_safe(&p, LogFailure::No).unwrap());
        assert!(!p.exists());
        assert!(!remove_nfs_safe(&p, LogFailure::No).unwrap());
        // Nothing left behind under a private name.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn nfs_safe_handles_long_names() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("n".repeat(240));
        fs::write(&p, b"x").unwrap();
        assert!(remove_nfs_safe(&p, LogFailure::Yes).unwrap());
        assert!(!p.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn nfs_safe_refuses_directories() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let err = remove_nfs_safe(&sub, LogFailure::No).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::IsADirectory);
        assert!(sub.is_dir());
    }

    #[test]
    fn remove_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        assert!(remove(&sub, LogFailure::No).is_err());
        assert!(sub.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn open_handle_survives_nfs_safe_removal() {
        use std::io::Read;
        let dir = tempdir().unwrap();
        let p = dir.path().join("held");
        fs::write(&p, b"still readable").unwrap();
        let mut held = fs::File::open(&p).unwrap();

        assert!(remove_nfs_safe(&p, LogFailure::Yes).unwrap());
        // The public name can be reused right away.
        fs::write(&p, b"new").unwrap();

        let mut s = String::new();
        held.read_to_string(&mut s).unwrap();
        assert_eq!(s, "still readable");
        assert_eq!(fs::read(&p).unwrap(), b"new");
    }
}
