//! Cache directory tagging (https://bford.info/cachedir/).

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use tracing::debug;

use super::helpers::io_error_with_help;
use super::write::write_fd;
use crate::errors::{FileError, Result};

pub const CACHEDIR_TAG_NAME: &str = "CACHEDIR.TAG";

/// Tag file content. Backup tools only look at the first line.
pub const CACHEDIR_TAG_CONTENT: &str = "Signature: 8a477f597d28d172789f06886806bc55\n\
# This file is a cache directory tag created by fileprim.\n\
# For information about cache directory tags, see:\n\
#\thttps://bford.info/cachedir/\n";

/// Make sure `dir` contains a `CACHEDIR.TAG` file.
///
/// An existing tag is left untouched, whatever its content, and counts as
/// success. `dir` itself must already exist.
pub fn create_cachedir_tag(dir: &Path) -> Result<()> {
    write_tag(&dir.join(CACHEDIR_TAG_NAME)).inspect_err(|e| {
        debug!(dir = %dir.display(), error = %e, "failed to create cache directory tag");
    })
}

fn write_tag(path: &Path) -> Result<()> {
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        // Already tagged, possibly by a concurrent caller.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
        Err(e) => return Err(io_error_with_help("create", path)(e)),
    };
    write_fd(&file, CACHEDIR_TAG_CONTENT.as_bytes()).map_err(|e| match e {
        FileError::ShortWrite { source, .. } => FileError::io("write", path, source),
        other => other,
    })?;
    debug!(path = %path.display(), "created cache directory tag");
    Ok(())
}
