//! Windows implementations of the raw calls.
//!
//! Notes:
//! - There is no close-on-exec concept for handles opened by std (they are
//!   not inheritable), so `set_cloexec` is a no-op.
//! - Preallocation goes through SetFileInformationByHandle(FileAllocationInfo).

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::windows::io::AsRawHandle;
use std::path::Path;

use windows_sys::Win32::Storage::FileSystem::{
    FILE_ALLOCATION_INFO, FileAllocationInfo, SetFileInformationByHandle,
};

/// Editors on Windows commonly save text as UTF-16LE with a BOM.
pub const TRANSCODE_UTF16LE_BOM: bool = true;

const ERROR_INVALID_FUNCTION: i32 = 1;
const ERROR_NOT_SUPPORTED: i32 = 50;
const ERROR_INVALID_PARAMETER: i32 = 87;

pub fn read(file: &File, buf: &mut [u8]) -> io::Result<usize> {
    let mut f = file;
    f.read(buf)
}

pub fn write(file: &File, buf: &[u8]) -> io::Result<usize> {
    let mut f = file;
    f.write(buf)
}

/// Reserve `new_size` bytes of allocation, then move end-of-file there.
/// Callers must only pass sizes above `current`: a smaller allocation size
/// truncates the file. The allocation size covers the whole file, so only
/// sparse files could see old ranges reserved; std never creates those.
pub fn preallocate(file: &File, current: u64, new_size: u64) -> io::Result<()> {
    debug_assert!(new_size > current);
    let allocation = i64::try_from(new_size)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "size exceeds i64::MAX"))?;
    let info = FILE_ALLOCATION_INFO {
        AllocationSize: allocation,
    };
    let ok = unsafe {
        SetFileInformationByHandle(
            file.as_raw_handle() as _,
            FileAllocationInfo,
            &info as *const FILE_ALLOCATION_INFO as *const _,
            std::mem::size_of::<FILE_ALLOCATION_INFO>() as u32,
        )
    };
    if ok == 0 {
        let err = io::Error::last_os_error();
        return match err.raw_os_error() {
            Some(ERROR_INVALID_FUNCTION | ERROR_NOT_SUPPORTED | ERROR_INVALID_PARAMETER) => {
                Err(io::Error::new(io::ErrorKind::Unsupported, err))
            }
            _ => Err(err),
        };
    }
    file.set_len(new_size)
}

/// No-op on Windows.
pub fn set_cloexec(_file: &File) -> io::Result<()> {
    Ok(())
}

/// Open log file for appending (no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// No-op on Windows; POSIX-style file modes are not applicable.
pub fn set_file_mode_0600(_path: &Path) -> io::Result<()> {
    Ok(())
}
