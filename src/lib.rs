//! Core library for `fileprim`.
//!
//! Safe, predictable file primitives over POSIX and Windows semantics:
//! copy with optional atomic replace, whole/partial reads with text
//! normalization, link-aware writes, NFS-safe removal, preallocation with a
//! zero-fill fallback, timestamps, close-on-exec and cache directory tags.
//!
//! The primitives live in [`fs_ops`] and report [`FileError`]. The
//! [`config`] and [`output`] modules serve the `fileprim` binary.

pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;

pub use config::{
    CONFIG_ENV, Config, LogLevel, create_template_config, default_config_path, load_config,
    load_config_from_path, path_has_symlink_ancestor,
};
pub use errors::{FileError, Result};
pub use fs_ops::{
    Allocation, FileContent, InPlace, LogFailure, ViaTmpFile, copy_file, create_cachedir_tag,
    fallocate, likely_size_on_disk, read_fd, read_file, read_file_part, remove,
    remove_nfs_safe, set_cloexec_flag, set_timestamps, write_fd, write_file,
};

/// Convenience re-exports for callers using the primitives directly.
pub mod prelude {
    pub use crate::errors::{FileError, Result};
    pub use crate::fs_ops::{
        Allocation, FileContent, InPlace, LogFailure, ViaTmpFile, copy_file, create_cachedir_tag,
        fallocate, likely_size_on_disk, read_fd, read_file, read_file_part, remove,
        remove_nfs_safe, set_cloexec_flag, set_timestamps, write_fd, write_file,
    };
}
