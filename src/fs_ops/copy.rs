//! File copy with optional atomic replace.
//!
//! - `ViaTmpFile::No`: truncate/create `dest` and stream into it. A failure
//!   midway can leave `dest` partially written.
//! - `ViaTmpFile::Yes`: stream into a temporary sibling of `dest`, close it,
//!   then rename it over `dest`. On failure the temporary file is removed and
//!   `dest` is left as it was.

use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

use super::ViaTmpFile;
use super::helpers::io_error_with_help;
use super::read::read_fd;
use super::write::write_fd;
use crate::errors::{FileError, Result};
use crate::platform::temp::TempFile;

/// Copy the content of `src` to `dest`.
pub fn copy_file(src: &Path, dest: &Path, via_tmp_file: ViaTmpFile) -> Result<()> {
    copy_with(src, dest, via_tmp_file, write_fd)
}

/// `copy_file` with the chunk writer supplied by the caller.
fn copy_with<W>(src: &Path, dest: &Path, via_tmp_file: ViaTmpFile, mut write: W) -> Result<()>
where
    W: FnMut(&File, &[u8]) -> Result<()>,
{
    let src_file = File::open(src).map_err(io_error_with_help("open", src))?;

    let bytes = match via_tmp_file {
        ViaTmpFile::No => {
            let dest_file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(dest)
                .map_err(io_error_with_help("open for writing", dest))?;
            stream(&src_file, src, &dest_file, dest, &mut write)?
        }
        ViaTmpFile::Yes => {
            let (tmp, tmp_file) = TempFile::create_for(dest)
                .map_err(io_error_with_help("create temporary file for", dest))?;
            let bytes = stream(&src_file, src, &tmp_file, tmp.path(), &mut write)?;
            drop(tmp_file);
            // `tmp` removes the file on drop unless the rename went through.
            tmp.persist(dest)
                .map_err(io_error_with_help("rename temporary file over", dest))?;
            bytes
        }
    };

    debug!(src = %src.display(), dest = %dest.display(), bytes, ?via_tmp_file, "copied file");
    Ok(())
}

/// Pump `src_file` into `dest_file`, attributing failures to the right path.
fn stream<W>(src_file: &File, src: &Path, dest_file: &File, dest: &Path, write: &mut W) -> Result<u64>
where
    W: FnMut(&File, &[u8]) -> Result<()>,
{
    let mut bytes = 0u64;
    read_fd(src_file, |chunk| {
        write(dest_file, chunk).map_err(|e| match e {
            FileError::ShortWrite { source, .. } => FileError::io("write", dest, source),
            other => other,
        })?;
        bytes += chunk.len() as u64;
        Ok(())
    })
    .map_err(|e| match e {
        FileError::Fd { op, source } => FileError::io(op, src, source),
        other => other,
    })?;
    Ok(bytes)
}
