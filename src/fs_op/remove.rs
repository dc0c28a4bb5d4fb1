use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::fs_op::error::{Outcome, Warning};
use crate::fs_op::stat::PathType;

/// Remove a file or directory tree at `path`.
///
/// Directories are emptied bottom-up before being removed themselves.
/// Nothing here is a hard failure: a missing path yields
/// [`Warning::NotFound`] and every entry that cannot be removed yields
/// [`Warning::DeleteFailed`] while the walk carries on with the rest.
/// Callers that need to know whether the tree is really gone must inspect
/// the returned warnings.
///
/// Symlinks are removed, never followed.
///
/// # Examples
///
/// ```no_run
/// use fsutil::fs_op::remove::delete;
/// let outcome = delete("/tmp/some_dir");
/// for w in &outcome.warnings {
///     eprintln!("{w}");
/// }
/// ```
pub fn delete(path: impl AsRef<Path>) -> Outcome<()> {
    let p = path.as_ref();
    let mut outcome = Outcome::new(());

    match PathType::of_link(p) {
        PathType::NotFound => outcome.warn(Warning::NotFound(p.to_path_buf())),
        PathType::Directory => remove_tree(p, &mut outcome),
        _ => remove_entry(p, false, &mut outcome),
    }

    outcome
}

fn remove_tree(root: &Path, outcome: &mut Outcome<()>) {
    for entry in WalkDir::new(root).contents_first(true) {
        match entry {
            Ok(e) => remove_entry(e.path(), e.file_type().is_dir(), outcome),
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                outcome.warn(Warning::Unreadable {
                    path,
                    source: io::Error::from(e),
                });
            }
        }
    }
}

fn remove_entry(path: &Path, is_dir: bool, outcome: &mut Outcome<()>) {
    let res = if is_dir {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    match res {
        Ok(()) => tracing::debug!("removed {}", path.display()),
        Err(source) => outcome.warn(Warning::DeleteFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Delete everything inside `dir`, keeping `dir` itself.
///
/// Warns (without failing) when `dir` is missing or not a directory.
pub fn clean(dir: impl AsRef<Path>) -> Outcome<()> {
    let d = dir.as_ref();
    let mut outcome = Outcome::new(());

    match PathType::of(d) {
        PathType::Directory => {}
        PathType::NotFound => {
            outcome.warn(Warning::NotFound(d.to_path_buf()));
            return outcome;
        }
        _ => {
            outcome.warn(Warning::NotADirectory(d.to_path_buf()));
            return outcome;
        }
    }

    let entries = match fs::read_dir(d) {
        Ok(entries) => entries,
        Err(source) => {
            outcome.warn(Warning::Unreadable {
                path: d.to_path_buf(),
                source,
            });
            return outcome;
        }
    };

    for entry in entries {
        match entry {
            Ok(e) => outcome.absorb(delete(e.path())),
            Err(source) => outcome.warn(Warning::Unreadable {
                path: d.to_path_buf(),
                source,
            }),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn delete_file_and_nested_dir() {
        let td = tempdir().expect("create temp dir");
        let dir = td.path().join("sub");
        std::fs::create_dir_all(dir.join("deeper/still")).expect("create subdirs");
        std::fs::write(dir.join("f.txt"), b"x").expect("write file");
        std::fs::write(dir.join("deeper/still/g.txt"), b"y").expect("write file");

        let lone = td.path().join("lone.txt");
        std::fs::write(&lone, b"z").expect("write file");
        assert!(delete(&lone).is_clean());
        assert!(!lone.exists(), "file should be removed");

        assert!(delete(&dir).is_clean());
        assert!(!dir.exists(), "dir should be removed");
        assert_eq!(std::fs::read_dir(td.path()).unwrap().count(), 0);
    }

    #[test]
    fn delete_nonexistent_only_warns() {
        let td = tempdir().expect("tempdir");
        let p = td.path().join("does_not_exist");
        let outcome = delete(&p);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(&outcome.warnings[0], Warning::NotFound(q) if q == &p));
    }

    #[cfg(unix)]
    #[test]
    fn delete_removes_link_not_target() {
        let td = tempdir().unwrap();
        let target = td.path().join("target");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), b"k").unwrap();
        let holder = td.path().join("holder");
        std::fs::create_dir(&holder).unwrap();
        std::os::unix::fs::symlink(&target, holder.join("link")).unwrap();

        assert!(delete(&holder).is_clean());
        assert!(!holder.exists());
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn clean_keeps_the_directory() {
        let td = tempdir().unwrap();
        let dir = td.path().join("work");
        std::fs::create_dir_all(dir.join("a/b")).unwrap();
        std::fs::write(dir.join("a/b/c.txt"), b"c").unwrap();
        std::fs::write(dir.join("top.txt"), b"t").unwrap();

        assert!(clean(&dir).is_clean());
        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn clean_warns_on_missing_and_files() {
        let td = tempdir().unwrap();
        let missing = clean(td.path().join("nope"));
        assert!(matches!(missing.warnings[..], [Warning::NotFound(_)]));

        let f = td.path().join("f.txt");
        std::fs::write(&f, b"f").unwrap();
        let not_dir = clean(&f);
        assert!(matches!(not_dir.warnings[..], [Warning::NotADirectory(_)]));
        assert!(f.exists());
    }
}
