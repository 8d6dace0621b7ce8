use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs;

/// Binary under test with the config pointed at a scratch location.
fn fileprim(td: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fileprim"));
    cmd.env("FILEPRIM_CONFIG", td.path().join("config.xml"));
    cmd
}

#[test]
fn size_on_disk_prints_rounded_value() {
    let td = TempDir::new().unwrap();
    let out = fileprim(&td).args(["size-on-disk", "4097"]).output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "8192");
}

#[test]
fn write_then_cat_round_trips_stdin() {
    let td = TempDir::new().unwrap();
    let f = td.child("out.txt");
    fileprim(&td)
        .args(["write"])
        .arg(f.path())
        .write_stdin("from stdin\n")
        .assert()
        .success();
    f.assert("from stdin\n");

    let out = fileprim(&td).arg("cat").arg(f.path()).output().unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout, b"from stdin\n");
}

#[test]
fn part_prints_slice() {
    let td = TempDir::new().unwrap();
    let f = td.child("digits");
    f.write_str("0123456789").unwrap();
    let out = fileprim(&td)
        .arg("part")
        .arg(f.path())
        .args(["4", "3", "--binary"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout, b"456");
}

#[test]
fn copy_and_remove() {
    let td = TempDir::new().unwrap();
    let src = td.child("src");
    let dest = td.child("dest");
    src.write_str("payload").unwrap();

    fileprim(&td)
        .arg("copy")
        .arg(src.path())
        .arg(dest.path())
        .arg("--via-tmp-file")
        .assert()
        .success();
    dest.assert("payload");

    let out = fileprim(&td).arg("rm").arg(dest.path()).arg("--nfs-safe").output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "removed");
    assert!(!dest.path().exists());

    let out = fileprim(&td).arg("rm").arg(dest.path()).output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "absent");
}

#[test]
fn missing_source_fails_with_message() {
    let td = TempDir::new().unwrap();
    let out = fileprim(&td)
        .arg("cat")
        .arg(td.path().join("nope"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope"));
}

#[test]
fn tag_and_alloc() {
    let td = TempDir::new().unwrap();
    fileprim(&td).arg("tag").arg(td.path()).assert().success();
    let tag = fs::read_to_string(td.path().join("CACHEDIR.TAG")).unwrap();
    assert!(tag.starts_with("Signature: 8a477f597d28d172789f06886806bc55"));

    let f = td.child("big");
    fileprim(&td).arg("alloc").arg(f.path()).arg("100000").assert().success();
    assert!(fs::metadata(f.path()).unwrap().len() >= 100_000);
}

#[test]
fn touch_sets_mtime() {
    let td = TempDir::new().unwrap();
    let f = td.child("t");
    f.touch().unwrap();
    fileprim(&td)
        .arg("touch")
        .arg(f.path())
        .args(["--mtime", "1000000000"])
        .assert()
        .success();
    let meta = fs::metadata(f.path()).unwrap();
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    assert_eq!(mtime.unix_seconds(), 1_000_000_000);
}

#[test]
fn config_prints_path_and_init_creates_template() {
    let td = TempDir::new().unwrap();
    let cfg = td.path().join("config.xml");
    let out = fileprim(&td).arg("config").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("config.xml"));

    fileprim(&td).args(["config", "--init"]).assert().success();
    assert!(fs::read_to_string(&cfg).unwrap().contains("<config>"));
    // Second init refuses to overwrite.
    fileprim(&td).args(["config", "--init"]).assert().failure();
}

#[test]
fn malformed_config_is_fatal() {
    let td = TempDir::new().unwrap();
    td.child("config.xml").write_str("<config><bogus/></config>").unwrap();
    fileprim(&td).args(["size-on-disk", "1"]).assert().failure();
}

#[test]
fn invalid_log_level_is_rejected() {
    let td = TempDir::new().unwrap();
    fileprim(&td)
        .args(["--log-level", "loud", "size-on-disk", "1"])
        .assert()
        .failure();
}
