use std::io;
use std::path::Path;

use fileprim::FileError;
use fileprim::fs_ops::{fd_error, io_error_with_help};

#[test]
fn notfound_fallback_hint_includes_path() {
    let p = Path::new("/nonexistent/path/for/test");
    let err = io_error_with_help("open", p)(io::Error::from(io::ErrorKind::NotFound));
    let msg = format!("{}", err);
    assert!(msg.contains("open"));
    assert!(msg.contains(p.to_string_lossy().as_ref()));
    assert!(msg.contains("path not found"));
    assert_eq!(err.code(), "not_found");
}

#[cfg(unix)]
#[test]
fn enospc_hint_present() {
    let err = io_error_with_help("write", Path::new("/tmp"))(io::Error::from_raw_os_error(libc::ENOSPC));
    let msg = format!("{}", err);
    assert!(msg.contains("insufficient space"), "msg was: {}", msg);
    assert!(msg.contains("os code"), "should include os code in message");
    assert_eq!(err.raw_os_error(), Some(libc::ENOSPC));
}

#[cfg(unix)]
#[test]
fn estale_hint_present() {
    let err = io_error_with_help("read", Path::new("/nfs/x"))(io::Error::from_raw_os_error(libc::ESTALE));
    assert!(err.to_string().contains("stale NFS handle"), "msg was: {err}");
}

#[test]
fn fd_errors_convert_back_into_io_errors() {
    let err = fd_error("fstat")(io::Error::from(io::ErrorKind::PermissionDenied));
    assert!(matches!(err, FileError::Fd { op: "fstat", .. }));
    assert_eq!(err.code(), "permission_denied");
    let io_err: io::Error = err.into();
    assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
}
