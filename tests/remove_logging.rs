use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use fileprim::{LogFailure, remove, remove_nfs_safe};
use tempfile::tempdir;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

/// Appends written bytes into a shared Vec<u8>.
#[derive(Clone)]
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a scoped subscriber and return what it logged.
fn capture<R>(json: bool, f: impl FnOnce() -> R) -> (R, String) {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let dispatch = if json {
        let layer = tsfmt::layer().json().with_writer(make_writer);
        tracing::Dispatch::new(registry().with(EnvFilter::new("debug")).with(layer))
    } else {
        let layer = tsfmt::layer().with_ansi(false).with_writer(make_writer).compact();
        tracing::Dispatch::new(registry().with(EnvFilter::new("debug")).with(layer))
    };
    let out = tracing::dispatcher::with_default(&dispatch, f);
    let contents = String::from_utf8_lossy(&buf.lock().unwrap()).into_owned();
    (out, contents)
}

#[test]
fn missing_paths_are_not_errors_and_not_logged() {
    let td = tempdir().unwrap();
    let p = td.path().join("never-existed");
    let ((a, b), logs) = capture(false, || {
        (remove(&p, LogFailure::Yes), remove_nfs_safe(&p, LogFailure::Yes))
    });
    assert!(!a.unwrap());
    assert!(!b.unwrap());
    assert!(!logs.contains("Removal failed"), "logs: {logs}");
}

#[test]
fn log_failure_toggles_warning_not_result() {
    let td = tempdir().unwrap();
    let dir = td.path().join("a_dir");
    std::fs::create_dir(&dir).unwrap();

    let (loud, loud_logs) = capture(false, || remove_nfs_safe(&dir, LogFailure::Yes));
    let (quiet, quiet_logs) = capture(false, || remove_nfs_safe(&dir, LogFailure::No));

    assert_eq!(loud.unwrap_err().kind(), quiet.unwrap_err().kind());
    assert!(loud_logs.contains("Removal failed"), "logs: {loud_logs}");
    assert!(loud_logs.contains("WARN"), "logs: {loud_logs}");
    assert!(!quiet_logs.contains("Removal failed"), "logs: {quiet_logs}");
    assert!(dir.is_dir());
}

#[test]
fn successful_removal_is_logged_with_path_field() {
    let td = tempdir().unwrap();
    let p = td.path().join("victim");
    std::fs::write(&p, b"x").unwrap();

    let (res, logs) = capture(true, || remove(&p, LogFailure::Yes));
    assert!(res.unwrap());

    let line = logs
        .lines()
        .find(|l| l.contains("Removed file"))
        .unwrap_or_else(|| panic!("no removal event in: {logs}"));
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["level"], "DEBUG");
    assert_eq!(v["fields"]["path"], p.display().to_string());
}
