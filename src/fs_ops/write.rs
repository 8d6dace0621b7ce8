//! Write primitives.
//!
//! - `write_fd` writes a whole buffer to a borrowed handle, retrying partial
//!   writes.
//! - `write_file` replaces a file's content. By default it unlinks the old
//!   file first so hard links keep the old content; `InPlace::Yes` rewrites
//!   the existing inode instead.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{debug, trace};

use super::InPlace;
use super::helpers::io_error_with_help;
use crate::errors::{FileError, Result};
use crate::platform;

/// Write all of `data` to `file`.
///
/// Interrupted and would-block writes are retried; a write that accepts zero
/// bytes is reported as `WriteZero`. On failure the error tells how many
/// bytes made it out.
pub fn write_fd(file: &File, data: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < data.len() {
        match platform::write(file, &data[written..]) {
            Ok(0) => {
                return Err(FileError::ShortWrite {
                    written,
                    total: data.len(),
                    source: io::Error::from(io::ErrorKind::WriteZero),
                });
            }
            Ok(n) => written += n,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                ) =>
            {
                continue;
            }
            Err(e) => {
                return Err(FileError::ShortWrite {
                    written,
                    total: data.len(),
                    source: e,
                });
            }
        }
    }
    Ok(())
}

/// Write `data` (text or binary) to `path`.
///
/// With `InPlace::No` an existing file is unlinked before the new one is
/// created, breaking hard links. With `InPlace::Yes` the existing inode is
/// truncated and rewritten, so every link observes the new content.
pub fn write_file(path: &Path, data: impl AsRef<[u8]>, in_place: InPlace) -> Result<()> {
    let data = data.as_ref();
    if in_place == InPlace::No {
        match fs::remove_file(path) {
            Ok(()) => trace!(path = %path.display(), "unlinked previous file before write"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            // Leave it to the open below to report anything that matters.
            Err(e) => debug!(path = %path.display(), error = %e, "could not unlink before write"),
        }
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(io_error_with_help("open for writing", path))?;
    write_fd(&file, data).map_err(|e| match e {
        FileError::ShortWrite { written, total, source } => {
            debug!(path = %path.display(), written, total, "short write");
            FileError::io("write", path, source)
        }
        other => other,
    })?;
    trace!(path = %path.display(), bytes = data.len(), ?in_place, "wrote file");
    Ok(())
}
