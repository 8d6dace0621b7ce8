//! Typed error definitions for fileprim.
//! Every fallible primitive reports one of these; the library never panics or exits.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::helpers::build_message;

/// Result alias used by the message-style primitives.
pub type Result<T, E = FileError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FileError {
    /// A syscall on a named path failed.
    #[error("{}", build_message(.op, .path, .source))]
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    /// A syscall on a caller-provided handle failed.
    #[error("{op}: {source}")]
    Fd {
        op: &'static str,
        source: io::Error,
    },

    #[error("failed to write {} of {total} bytes: {source}", .total - .written)]
    ShortWrite {
        written: usize,
        total: usize,
        source: io::Error,
    },

    #[error("invalid text in '{}': {reason}", .path.display())]
    InvalidText { path: PathBuf, reason: String },
}

impl FileError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        FileError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn fd(op: &'static str, source: io::Error) -> Self {
        FileError::Fd { op, source }
    }

    fn io_source(&self) -> Option<&io::Error> {
        match self {
            FileError::Io { source, .. }
            | FileError::Fd { source, .. }
            | FileError::ShortWrite { source, .. } => Some(source),
            FileError::InvalidText { .. } => None,
        }
    }

    /// Stable short tag for logs and tests.
    pub fn code(&self) -> &'static str {
        match self {
            FileError::ShortWrite { .. } => "short_write",
            FileError::InvalidText { .. } => "invalid_text",
            _ => match self.kind() {
                io::ErrorKind::NotFound => "not_found",
                io::ErrorKind::PermissionDenied => "permission_denied",
                io::ErrorKind::AlreadyExists => "already_exists",
                io::ErrorKind::StorageFull => "storage_full",
                io::ErrorKind::Unsupported => "unsupported",
                _ => "io",
            },
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.io_source()
            .map(io::Error::kind)
            .unwrap_or(io::ErrorKind::InvalidData)
    }

    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_source().and_then(io::Error::raw_os_error)
    }
}

impl From<FileError> for io::Error {
    fn from(e: FileError) -> Self {
        io::Error::new(e.kind(), e)
    }
}
