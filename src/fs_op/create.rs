use std::fs;
use std::path::{Path, PathBuf};

use crate::fs_op::error::{FsOpError, Outcome, Warning};
use crate::fs_op::stat::PathType;

/// Create `parent/child` and any missing ancestors.
///
/// An existing path is returned as-is; unless `skip_if_exists` is set this
/// also raises [`Warning::AlreadyExists`]. An existing *file* at the target
/// is still only a warning, so callers wanting a directory must check the
/// returned path's kind. Failing to create the directory is a hard error.
///
/// An empty `child` targets `parent` itself.
pub fn make_directory(
    parent: &Path,
    child: &str,
    skip_if_exists: bool,
) -> Result<Outcome<PathBuf>, FsOpError> {
    let dir = if child.is_empty() {
        parent.to_path_buf()
    } else {
        parent.join(child)
    };
    let mut outcome = Outcome::new(dir);

    if PathType::of(&outcome.value).exists() {
        if !skip_if_exists {
            let existing = outcome.value.clone();
            outcome.warn(Warning::AlreadyExists(existing));
        }
        return Ok(outcome);
    }

    fs::create_dir_all(&outcome.value)?;
    tracing::debug!("created directory {}", outcome.value.display());
    Ok(outcome)
}

/// Create `dir` and any missing ancestors. See [`make_directory`].
pub fn make_dir(dir: &Path, skip_if_exists: bool) -> Result<Outcome<PathBuf>, FsOpError> {
    make_directory(dir, "", skip_if_exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_ancestors() {
        let td = tempdir().unwrap();
        let out = make_directory(td.path(), "a/b/c", false).unwrap();
        assert!(out.is_clean());
        assert_eq!(out.value, td.path().join("a/b/c"));
        assert!(out.value.is_dir());
    }

    #[test]
    fn existing_directory_warns_unless_skipped() {
        let td = tempdir().unwrap();
        let dir = td.path().join("present");
        std::fs::create_dir(&dir).unwrap();

        let warned = make_dir(&dir, false).unwrap();
        assert_eq!(warned.value, dir);
        assert!(matches!(&warned.warnings[..], [Warning::AlreadyExists(p)] if p == &dir));

        let skipped = make_dir(&dir, true).unwrap();
        assert_eq!(skipped.value, dir);
        assert!(skipped.is_clean());
    }

    #[test]
    fn blocked_by_a_file_ancestor_is_an_error() {
        let td = tempdir().unwrap();
        let f = td.path().join("file");
        std::fs::write(&f, b"x").unwrap();
        assert!(make_directory(&f, "child", false).is_err());
    }
}
