//! Error adapters for the primitives.
//!
//! Wraps io::Error into FileError with the failing operation and path, and
//! builds the human-readable message with platform-aware hints.
//!
//! Usage:
//!   File::open(p).map_err(io_error_with_help("open", p))?;
//!   file.metadata().map_err(fd_error("stat"))?;

use std::io;
use std::path::Path;

use crate::errors::FileError;

/// Format "<op> '<path>': <error>" plus a hint and the OS code when known.
pub(crate) fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" — permission denied; check ownership and mode bits.");
                }
                libc::ENOENT => {
                    msg.push_str(" — path not found; verify it exists.");
                }
                libc::EEXIST => {
                    msg.push_str(" — already exists.");
                }
                libc::EISDIR => {
                    msg.push_str(" — is a directory; only regular files are supported.");
                }
                libc::ENOSPC => {
                    msg.push_str(" — insufficient space on device.");
                }
                libc::EFBIG => {
                    msg.push_str(" — file too large for this filesystem.");
                }
                libc::EROFS => {
                    msg.push_str(" — read-only filesystem.");
                }
                libc::ESTALE => {
                    msg.push_str(" — stale NFS handle; the file was replaced on the server.");
                }
                libc::EXDEV => {
                    msg.push_str(" — cross-filesystem rename; temporary file must share the destination's directory.");
                }
                libc::EBUSY => {
                    msg.push_str(" — resource busy.");
                }
                libc::EMFILE | libc::ENFILE => {
                    msg.push_str(" — too many open files.");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" — access denied; check permissions."), // ERROR_ACCESS_DENIED
                2 | 3 => msg.push_str(" — path not found; verify it exists."), // FILE/PATH NOT FOUND
                17 => msg.push_str(" — not same device; cross-volume rename."), // ERROR_NOT_SAME_DEVICE
                32 => msg.push_str(" — sharing violation; file is open elsewhere."), // ERROR_SHARING_VIOLATION
                80 | 183 => msg.push_str(" — already exists."), // ERROR_FILE_EXISTS / ERROR_ALREADY_EXISTS
                112 => msg.push_str(" — insufficient disk space."), // ERROR_DISK_FULL
                19 => msg.push_str(" — write protected media."), // ERROR_WRITE_PROTECT
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::NotFound => msg.push_str(" — path not found; verify it exists."),
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" — permission denied; check ownership and mode bits.")
            }
            io::ErrorKind::AlreadyExists => msg.push_str(" — already exists."),
            io::ErrorKind::WriteZero => msg.push_str(" — device accepted no more bytes."),
            _ => {}
        }
    }

    msg
}

/// Returns a closure for `.map_err(...)` that converts io::Error into a
/// path-carrying FileError.
pub fn io_error_with_help<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> FileError + 'a {
    move |e: io::Error| FileError::io(op, path, e)
}

/// Same as [`io_error_with_help`] for failures on a caller-provided handle.
pub fn fd_error(op: &'static str) -> impl FnOnce(io::Error) -> FileError {
    move |e: io::Error| FileError::fd(op, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notfound_kind_hint_includes_path() {
        let p = Path::new("/nonexistent/path/for/test");
        let err = io_error_with_help("open", p)(io::Error::from(io::ErrorKind::NotFound));
        let msg = err.to_string();
        assert!(msg.starts_with("open '/nonexistent/path/for/test'"), "msg was: {msg}");
        assert!(msg.contains("path not found"));
    }

    #[cfg(unix)]
    #[test]
    fn enospc_hint_and_os_code() {
        let msg = build_message("write", Path::new("/tmp/x"), &io::Error::from_raw_os_error(libc::ENOSPC));
        assert!(msg.contains("insufficient space"), "msg was: {msg}");
        assert!(msg.contains("os code"), "msg was: {msg}");
    }

    #[cfg(unix)]
    #[test]
    fn estale_hint_mentions_nfs() {
        let msg = build_message("rename", Path::new("/tmp/x"), &io::Error::from_raw_os_error(libc::ESTALE));
        assert!(msg.contains("stale NFS handle"), "msg was: {msg}");
    }

    #[test]
    fn fd_error_keeps_kind() {
        let err = fd_error("read")(io::Error::from(io::ErrorKind::Interrupted));
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
        assert!(err.to_string().starts_with("read:"));
    }
}
