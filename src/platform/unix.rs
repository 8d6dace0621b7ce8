//! Unix implementations of the raw calls (libc).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::os::unix::io::AsRawFd;
use std::path::Path;

/// Text reads never see UTF-16 files in practice on Unix; pass bytes through.
pub const TRANSCODE_UTF16LE_BOM: bool = false;

/// Single read(2). Returns the byte count; 0 means end of file.
pub fn read(file: &File, buf: &mut [u8]) -> io::Result<usize> {
    let rc = unsafe { libc::read(file.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len()) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(rc as usize)
}

/// Single write(2). May write fewer bytes than requested.
pub fn write(file: &File, buf: &[u8]) -> io::Result<usize> {
    let rc = unsafe { libc::write(file.as_raw_fd(), buf.as_ptr().cast(), buf.len()) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(rc as usize)
}

/// posix_fallocate(3) over [current, new_size), so holes below the old end
/// of file stay holes. EINVAL/EOPNOTSUPP mean the filesystem can't do it and
/// are mapped to `Unsupported`.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
pub fn preallocate(file: &File, current: u64, new_size: u64) -> io::Result<()> {
    let too_big = |_| io::Error::from_raw_os_error(libc::EFBIG);
    let offset = libc::off_t::try_from(current).map_err(too_big)?;
    let len = libc::off_t::try_from(new_size.saturating_sub(current)).map_err(too_big)?;
    // posix_fallocate returns the error number instead of setting errno.
    let rc = unsafe { libc::posix_fallocate(file.as_raw_fd(), offset, len) };
    match rc {
        0 => Ok(()),
        libc::EINVAL | libc::EOPNOTSUPP => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            io::Error::from_raw_os_error(rc),
        )),
        _ => Err(io::Error::from_raw_os_error(rc)),
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
pub fn preallocate(_file: &File, _current: u64, _new_size: u64) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "posix_fallocate not available on this platform",
    ))
}

/// Set FD_CLOEXEC, preserving the other descriptor flags.
pub fn set_cloexec(file: &File) -> io::Result<()> {
    let fd = file.as_raw_fd();
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    if flags & libc::FD_CLOEXEC != 0 {
        return Ok(());
    }
    if unsafe { libc::fcntl(fd, libc::F_SETFD, flags | libc::FD_CLOEXEC) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Open a log file for appending. New files get 0600; the final component
/// must not be a symlink (O_NOFOLLOW).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .custom_flags(libc::O_NOFOLLOW | libc::O_CLOEXEC)
        .open(path)
}

/// POSIX chmod 0600 for files.
pub fn set_file_mode_0600(path: &Path) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}
