//! Platform-specific raw calls.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the primitives in `fs_ops` stay platform-agnostic.
//!
//! Conventions:
//! - Handles are borrowed `&File`; nothing here closes them.
//! - `preallocate` returns `ErrorKind::Unsupported` when the caller should
//!   fall back to writing zeros.

pub mod temp;

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    TRANSCODE_UTF16LE_BOM, open_log_file_secure_append, preallocate, read, set_cloexec,
    set_file_mode_0600, write,
};

#[cfg(not(unix))]
pub use windows::{
    TRANSCODE_UTF16LE_BOM, open_log_file_secure_append, preallocate, read, set_cloexec,
    set_file_mode_0600, write,
};
