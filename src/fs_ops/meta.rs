//! Best-effort metadata operations: timestamps and close-on-exec.
//!
//! Neither reports failure to the caller; problems are logged and ignored.

use filetime::{FileTime, set_file_times};
use std::fs::File;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, trace};

use crate::platform;

/// Set the modification and access times of `path`.
///
/// `mtime` defaults to now; `atime` defaults to the resolved `mtime`. Both
/// are applied in one call.
pub fn set_timestamps(path: &Path, mtime: Option<SystemTime>, atime: Option<SystemTime>) {
    let mtime = mtime.unwrap_or_else(SystemTime::now);
    let atime = atime.unwrap_or(mtime);
    if let Err(e) = set_file_times(
        path,
        FileTime::from_system_time(atime),
        FileTime::from_system_time(mtime),
    ) {
        debug!(path = %path.display(), error = %e, "failed to set timestamps");
    }
}

/// Mark `file` close-on-exec so child processes don't inherit it. No-op on
/// platforms without the concept.
pub fn set_cloexec_flag(file: &File) {
    if let Err(e) = platform::set_cloexec(file) {
        trace!(error = %e, "failed to set close-on-exec");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    #[test]
    fn explicit_times_are_applied() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        let mtime = UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        let atime = UNIX_EPOCH + Duration::from_secs(1_100_000_000);
        set_timestamps(&path, Some(mtime), Some(atime));

        let meta = fs::metadata(&path).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), 1_000_000_000);
        assert_eq!(FileTime::from_last_access_time(&meta).unix_seconds(), 1_100_000_000);
    }

    #[test]
    fn atime_follows_mtime_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        let mtime = UNIX_EPOCH + Duration::from_secs(1_234_567_890);
        set_timestamps(&path, Some(mtime), None);

        let meta = fs::metadata(&path).unwrap();
        let m = FileTime::from_last_modification_time(&meta);
        let a = FileTime::from_last_access_time(&meta);
        assert_eq!(m.unix_seconds(), 1_234_567_890);
        assert_eq!(a, m);
    }

    #[test]
    fn defaults_to_now() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        set_timestamps(&path, Some(UNIX_EPOCH + Duration::from_secs(10)), None);
        let before = SystemTime::now() - Duration::from_secs(5);
        set_timestamps(&path, None, None);
        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        assert!(modified >= before);
    }

    #[test]
    fn default_atime_matches_default_mtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        set_timestamps(&path, Some(UNIX_EPOCH + Duration::from_secs(10)), Some(UNIX_EPOCH));
        set_timestamps(&path, None, None);

        let meta = fs::metadata(&path).unwrap();
        let m = FileTime::from_last_modification_time(&meta);
        let a = FileTime::from_last_access_time(&meta);
        assert_eq!(a, m);
        assert!(m.unix_seconds() > 10);
    }

    #[test]
    fn missing_path_is_silently_ignored() {
        let dir = tempdir().unwrap();
        set_timestamps(&dir.path().join("missing"), None, None);
        assert!(!dir.path().join("missing").exists());
    }

    #[cfg(unix)]
    #[test]
    fn cloexec_flag_is_set() {
        use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd};
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        let file = File::open(&path).unwrap();
        // std opens with O_CLOEXEC; clear it to observe the change.
        let fd = file.into_raw_fd();
        unsafe { libc::fcntl(fd, libc::F_SETFD, 0) };
        let file = unsafe { File::from_raw_fd(fd) };
        assert_eq!(unsafe { libc::fcntl(file.as_raw_fd(), libc::F_GETFD) } & libc::FD_CLOEXEC, 0);

        set_cloexec_flag(&file);
        let flags = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_GETFD) };
        assert_ne!(flags & libc::FD_CLOEXEC, 0);
    }
}
