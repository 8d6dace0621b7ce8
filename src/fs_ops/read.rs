//! Read primitives.
//!
//! - `read_fd` streams a borrowed handle to a receiver, chunk by chunk.
//! - `read_file` / `read_file_part` return content in the representation the
//!   caller picks through [`FileContent`]: `Vec<u8>` for binary data,
//!   `String` for text.
//!
//! Text reads transcode a UTF-16LE file with a byte-order mark to UTF-8 on
//! Windows. Everything else is validated as UTF-8 and returned unchanged.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;
use tracing::trace;

use super::helpers::{fd_error, io_error_with_help};
use crate::errors::{FileError, Result};
use crate::platform;

/// Chunk size handed to `read_fd` receivers.
const READ_CHUNK: usize = 64 * 1024;
/// Smallest buffer used for whole-file reads.
const MIN_READ_BUFFER: usize = 1024;
/// Upper bound for up-front buffer sizing; a bogus size hint must not
/// trigger a huge allocation. Larger files still read fine by growing.
const MAX_PRESIZED_BUFFER: u64 = 256 * 1024 * 1024;

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Representation a read primitive produces from the raw file bytes.
pub trait FileContent: Sized {
    fn from_bytes(bytes: Vec<u8>, path: &Path) -> Result<Self>;
}

impl FileContent for Vec<u8> {
    fn from_bytes(bytes: Vec<u8>, _path: &Path) -> Result<Self> {
        Ok(bytes)
    }
}

impl FileContent for String {
    fn from_bytes(bytes: Vec<u8>, path: &Path) -> Result<Self> {
        if platform::TRANSCODE_UTF16LE_BOM && bytes.starts_with(&UTF16LE_BOM) {
            return decode_utf16le(&bytes[UTF16LE_BOM.len()..]).map_err(|reason| {
                FileError::InvalidText {
                    path: path.to_path_buf(),
                    reason,
                }
            });
        }
        String::from_utf8(bytes).map_err(|e| FileError::InvalidText {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Decode BOM-less UTF-16LE bytes into a UTF-8 String.
pub(crate) fn decode_utf16le(bytes: &[u8]) -> std::result::Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err(format!(
            "UTF-16LE content has an odd number of bytes ({})",
            bytes.len()
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| e.to_string())
}

/// Read `file` until end of file, calling `receiver` once per chunk, in order.
///
/// Interrupted reads are retried. An error returned by the receiver stops the
/// loop and is propagated as-is. The handle is not closed.
pub fn read_fd<F>(file: &File, mut receiver: F) -> Result<()>
where
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match platform::read(file, &mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => receiver(&buf[..n])?,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(fd_error("read")(e)),
        }
    }
}

/// Return the whole content of `path`.
///
/// `size_hint` is the expected size; 0 means "stat the file". It only sizes
/// the initial buffer, so a wrong hint costs a reallocation, nothing more.
pub fn read_file<T: FileContent>(path: &Path, size_hint: u64) -> Result<T> {
    let file = File::open(path).map_err(io_error_with_help("open", path))?;
    let size_hint = if size_hint == 0 {
        file.metadata().map_err(io_error_with_help("stat", path))?.len()
    } else {
        size_hint
    };
    // One spare byte so end of file shows up on the first pass.
    let initial = size_hint.saturating_add(1).min(MAX_PRESIZED_BUFFER) as usize;
    let data = read_up_to(&file, initial.max(MIN_READ_BUFFER), None)
        .map_err(io_error_with_help("read", path))?;
    trace!(path = %path.display(), bytes = data.len(), "read file");
    T::from_bytes(data, path)
}

/// Return at most `count` bytes of `path` starting at offset `pos`.
///
/// A `pos` at or past end of file yields empty content, not an error.
/// The range is in bytes: for `String`, a range that starts or ends inside a
/// multi-byte character fails with `InvalidText`. Read `Vec<u8>` to get raw
/// slices.
pub fn read_file_part<T: FileContent>(path: &Path, pos: u64, count: usize) -> Result<T> {
    if count == 0 {
        return T::from_bytes(Vec::new(), path);
    }
    let mut file = File::open(path).map_err(io_error_with_help("open", path))?;
    if pos != 0 {
        file.seek(SeekFrom::Start(pos))
            .map_err(io_error_with_help("seek", path))?;
    }
    let initial = (count as u64).min(MAX_PRESIZED_BUFFER) as usize;
    let data = read_up_to(&file, initial, Some(count)).map_err(io_error_with_help("read", path))?;
    trace!(path = %path.display(), pos, bytes = data.len(), "read file part");
    T::from_bytes(data, path)
}

/// Read until end of file or until `limit` bytes, growing the buffer by
/// doubling from `initial`.
fn read_up_to(file: &File, initial: usize, limit: Option<usize>) -> io::Result<Vec<u8>> {
    let mut data = vec![0u8; initial];
    let mut filled = 0;
    while limit.is_none_or(|l| filled < l) {
        if filled == data.len() {
            let grown = data.len().saturating_mul(2).max(MIN_READ_BUFFER);
            data.resize(limit.map_or(grown, |l| grown.min(l)), 0);
        }
        match platform::read(file, &mut data[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    data.truncate(filled);
    Ok(data)
}
