//! File primitives: copy, read, write, remove, preallocate, timestamps.
//!
//! Every primitive is synchronous and returns an explicit Result. Handles
//! passed in are borrowed and never closed; handles opened here are closed
//! on every exit path.

mod alloc;
mod cachedir;
mod copy;
pub(crate) mod helpers;
mod meta;
mod read;
mod remove;
mod write;

pub use alloc::{Allocation, fallocate, likely_size_on_disk};
pub use cachedir::{CACHEDIR_TAG_CONTENT, CACHEDIR_TAG_NAME, create_cachedir_tag};
pub use copy::copy_file;
pub use helpers::{fd_error, io_error_with_help};
pub use meta::{set_cloexec_flag, set_timestamps};
pub use read::{FileContent, read_fd, read_file, read_file_part};
pub use remove::{remove, remove_nfs_safe};
pub use write::{write_fd, write_file};

/// Whether `copy_file` goes through a temporary file and an atomic rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViaTmpFile {
    Yes,
    #[default]
    No,
}

/// Whether `write_file` rewrites the existing inode instead of replacing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InPlace {
    Yes,
    #[default]
    No,
}

/// Whether removal failures are also reported on the diagnostic channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFailure {
    #[default]
    Yes,
    No,
}

macro_rules! impl_from_bool {
    ($($t:ident),*) => {
        $(impl From<bool> for $t {
            fn from(b: bool) -> Self {
                if b { $t::Yes } else { $t::No }
            }
        })*
    };
}

impl_from_bool!(ViaTmpFile, InPlace, LogFailure);
