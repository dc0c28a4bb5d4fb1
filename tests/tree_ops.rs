use std::fs;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use fsutil::fs_op::{
    clean, copy, count_lines, delete, force_copy, list_files, move_to, read_as_text, write_text,
    ExtensionSet, Warning,
};

fn fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("root/a.txt").write_str("alpha\n").unwrap();
    temp.child("root/sub/b.md").write_str("# beta").unwrap();
    temp.child("dest").create_dir_all().unwrap();
    temp
}

#[test]
fn copy_reproduces_tree_under_destination() {
    let temp = fixture();
    let outcome = copy(temp.child("root").path(), temp.child("dest").path()).unwrap();

    assert!(outcome.is_clean());
    temp.child("dest/root/a.txt").assert("alpha\n");
    temp.child("dest/root/sub/b.md").assert("# beta");
    // Source untouched.
    temp.child("root/a.txt").assert(predicate::path::exists());
    assert_eq!(outcome.value.created.len(), 4);
    assert_eq!(outcome.value.bytes_copied, 12);
}

#[test]
fn force_copy_respects_overwrite_flag() {
    let temp = fixture();
    temp.child("dest/root/a.txt").write_str("stale").unwrap();

    let kept = force_copy(temp.child("root").path(), temp.child("dest").path(), false).unwrap();
    temp.child("dest/root/a.txt").assert("stale");
    temp.child("dest/root/sub/b.md").assert("# beta");
    assert_eq!(kept.value.skipped, vec![temp.child("dest/root/a.txt").path().to_path_buf()]);
    assert!(kept.is_clean());

    let replaced = force_copy(temp.child("root").path(), temp.child("dest").path(), true).unwrap();
    temp.child("dest/root/a.txt").assert("alpha\n");
    temp.child("dest/root/sub/b.md").assert("# beta");
    assert_eq!(replaced.value.overwritten.len(), 2);
    assert!(replaced.value.created.is_empty());
}

#[test]
fn move_removes_the_source_tree() {
    let temp = fixture();
    move_to(temp.child("root").path(), temp.child("dest").path()).unwrap();
    temp.child("root").assert(predicate::path::missing());
    temp.child("dest/root/sub/b.md").assert("# beta");
}

#[test]
fn delete_removes_whole_tree_and_tolerates_absence() {
    let temp = fixture();
    let root = temp.child("root");

    assert!(delete(root.path()).is_clean());
    root.assert(predicate::path::missing());
    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("dest")]);

    let again = delete(root.path());
    assert!(matches!(&again.warnings[..], [Warning::NotFound(_)]));
}

#[test]
fn clean_empties_but_keeps_directory() {
    let temp = fixture();
    assert!(clean(temp.child("root").path()).is_clean());
    temp.child("root").assert(predicate::path::is_dir());
    assert_eq!(fs::read_dir(temp.child("root").path()).unwrap().count(), 0);
}

#[test]
fn listing_with_and_without_filter() {
    let temp = fixture();
    temp.child("root/sub/c.TXT").write_str("upper").unwrap();

    let all = list_files(temp.child("root").path(), &ExtensionSet::any()).unwrap();
    assert_eq!(all.len(), 3);
    let mut dedup = all.clone();
    dedup.dedup();
    assert_eq!(dedup, all);

    let txt: ExtensionSet = ["txt"].into_iter().collect();
    let only_txt = list_files(temp.child("root").path(), &txt).unwrap();
    assert_eq!(only_txt, vec![temp.child("root/a.txt").path().to_path_buf()]);
}

#[test]
fn text_round_trip_and_line_count() {
    let temp = TempDir::new().unwrap();
    let f = temp.child("notes.txt");
    write_text("a\nb\r\nc", f.path()).unwrap();
    assert_eq!(read_as_text(f.path()).unwrap(), "a\r\nb\r\nc");
    assert_eq!(count_lines(f.path()).unwrap(), 3);
}
