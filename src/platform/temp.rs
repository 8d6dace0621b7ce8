//! Unique sibling names and the temporary-file guard used for atomic replace.
//!
//! Siblings live in the target's own directory so the final rename never
//! crosses a filesystem boundary.
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Attempts before giving up on finding a free temporary name.
const CREATE_ATTEMPTS: u32 = 16;

/// Longest file name (in bytes) most filesystems accept.
const NAME_MAX: usize = 255;

/// Generate a unique hidden sibling of `target`.
/// Pattern: .<file name>.<pid>.<nanos>.<seq>.<suffix>
///
/// The file name part is shortened as needed to keep the whole name within
/// `NAME_MAX` bytes; the unique tail is never cut.
pub fn unique_sibling_name(target: &Path, suffix: &str) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tail = format!(".{pid}.{nanos}.{seq}.{suffix}");
    let mut base = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    truncate_on_char_boundary(&mut base, NAME_MAX.saturating_sub(1 + tail.len()));
    target.with_file_name(format!(".{base}{tail}"))
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

/// Guard for a freshly created temporary file next to its final destination.
///
/// Dropping the guard without calling [`TempFile::persist`] removes the file,
/// so every early return leaves nothing behind.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Create a new empty sibling of `target` with O_EXCL semantics. The
    /// handle is returned separately and must be closed before `persist`.
    pub fn create_for(target: &Path) -> io::Result<(Self, File)> {
        let mut last_err = None;
        for _ in 0..CREATE_ATTEMPTS {
            let path = unique_sibling_name(target, "tmp");
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((TempFile { path }, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_err = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AlreadyExists)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the temporary file over `target`. On failure the guard is
    /// still armed and the temporary file is removed when it drops.
    pub fn persist(mut self, target: &Path) -> io::Result<()> {
        fs::rename(&self.path, target)?;
        self.path = PathBuf::new();
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.path.as_os_str().is_empty() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
