//! Space reservation and size estimation.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use tracing::{debug, trace};

use super::helpers::fd_error;
use super::write::write_fd;
use crate::errors::Result;
use crate::platform;

/// Block granularity assumed by [`likely_size_on_disk`].
const DISK_BLOCK: u64 = 4096;
/// Zero-fill chunk for the fallback path.
const ZERO_CHUNK: usize = 64 * 1024;

/// How `fallocate` satisfied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// The platform reserved the blocks.
    Preallocated,
    /// Zeros were appended to reach the requested size.
    ZeroFilled,
    /// The file was already at least the requested size; nothing changed.
    AlreadyLargeEnough,
}

/// Ensure `file` is at least `new_size` bytes long with the space reserved.
///
/// Never shrinks the file. Uses the platform's reservation call when there
/// is one and falls back to appending zeros when the filesystem refuses.
/// Either way only the range past the old end of file is touched; existing
/// holes are not backfilled. The file position is the same on return as on
/// entry.
pub fn fallocate(file: &File, new_size: u64) -> Result<Allocation> {
    let current = file.metadata().map_err(fd_error("fstat"))?.len();
    if current >= new_size {
        return Ok(Allocation::AlreadyLargeEnough);
    }

    match platform::preallocate(file, current, new_size) {
        Ok(()) => {
            trace!(new_size, "preallocated");
            Ok(Allocation::Preallocated)
        }
        Err(e) if e.kind() == io::ErrorKind::Unsupported => {
            debug!(error = %e, new_size, "preallocation unsupported, zero-filling");
            zero_fill(file, current, new_size)?;
            Ok(Allocation::ZeroFilled)
        }
        Err(e) => Err(fd_error("fallocate")(e)),
    }
}

/// Append `new_size - current` zero bytes, restoring the file position.
fn zero_fill(file: &File, current: u64, new_size: u64) -> Result<()> {
    let mut handle = file;
    let saved = handle.stream_position().map_err(fd_error("tell"))?;
    let filled = handle
        .seek(SeekFrom::End(0))
        .map_err(fd_error("seek"))
        .and_then(|_| {
            let zeros = vec![0u8; ZERO_CHUNK];
            let mut remaining = new_size - current;
            while remaining > 0 {
                let n = remaining.min(ZERO_CHUNK as u64) as usize;
                write_fd(file, &zeros[..n])?;
                remaining -= n as u64;
            }
            Ok(())
        });
    let restored = handle.seek(SeekFrom::Start(saved));
    filled?;
    restored.map_err(fd_error("seek"))?;
    Ok(())
}

/// Estimate the on-disk footprint of a file of `size` bytes: round up to a
/// whole number of 4 KiB blocks. Saturates near `u64::MAX`.
pub const fn likely_size_on_disk(size: u64) -> u64 {
    size.saturating_add(DISK_BLOCK - 1) & !(DISK_BLOCK - 1)
}

impl std::fmt::Display for Allocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Allocation::Preallocated => "preallocated",
            Allocation::ZeroFilled => "zero-filled",
            Allocation::AlreadyLargeEnough => "already large enough",
        })
    }
}
