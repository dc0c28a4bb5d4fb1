use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn fsutil() -> Command {
    let mut cmd = Command::cargo_bin("fsutil").unwrap();
    // Keep the per-user config and RUST_LOG out of the picture.
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn copy_command_copies_into_destination() {
    let temp = TempDir::new().unwrap();
    temp.child("src/one.txt").write_str("1").unwrap();
    temp.child("out").create_dir_all().unwrap();
    let cfg = temp.child("cfg.toml");
    cfg.write_str("buffer_size = 2\n").unwrap();

    fsutil()
        .arg("--config")
        .arg(cfg.path())
        .arg("copy")
        .arg(temp.child("src").path())
        .arg(temp.child("out").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("copied 2 paths (1 bytes)"));
    temp.child("out/src/one.txt").assert("1");
}

#[test]
fn strict_mode_fails_on_warnings() {
    let temp = TempDir::new().unwrap();
    let cfg = temp.child("cfg.toml");
    cfg.write_str("").unwrap();
    let missing = temp.child("missing");

    fsutil()
        .args(["--config"])
        .arg(cfg.path())
        .arg("delete")
        .arg(missing.path())
        .assert()
        .success();

    fsutil()
        .arg("--config")
        .arg(cfg.path())
        .arg("--strict")
        .arg("delete")
        .arg(missing.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn list_filters_by_extension() {
    let temp = TempDir::new().unwrap();
    temp.child("d/a.txt").touch().unwrap();
    temp.child("d/b.md").touch().unwrap();
    let cfg = temp.child("cfg.toml");
    cfg.write_str("").unwrap();

    fsutil()
        .arg("--config")
        .arg(cfg.path())
        .arg("list")
        .arg(temp.child("d").path())
        .args(["-e", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("b.md").and(predicate::str::contains("a.txt").not()));
}

#[test]
fn lines_and_bad_config() {
    let temp = TempDir::new().unwrap();
    let f = temp.child("f.txt");
    f.write_str("x\ny\n").unwrap();
    let cfg = temp.child("cfg.toml");
    cfg.write_str("").unwrap();

    fsutil()
        .arg("--config")
        .arg(cfg.path())
        .arg("lines")
        .arg(f.path())
        .assert()
        .success()
        .stdout("3\n");

    let bad = temp.child("bad.toml");
    bad.write_str("max_depth = 0\n").unwrap();
    fsutil()
        .arg("--config")
        .arg(bad.path())
        .arg("lines")
        .arg(f.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_depth"));
}

#[test]
fn write_and_cat_share_the_configured_charset() {
    let temp = TempDir::new().unwrap();
    let cfg = temp.child("cfg.toml");
    cfg.write_str("charset = \"latin1\"\n").unwrap();
    let f = temp.child("tea.txt");

    fsutil()
        .arg("--config")
        .arg(cfg.path())
        .arg("write")
        .arg(f.path())
        .arg("thé\ncafé")
        .assert()
        .success();
    assert_eq!(std::fs::read(f.path()).unwrap(), b"th\xe9\r\ncaf\xe9");

    fsutil()
        .arg("--config")
        .arg(cfg.path())
        .arg("cat")
        .arg(f.path())
        .assert()
        .success()
        .stdout("thé\r\ncafé\n");
}
