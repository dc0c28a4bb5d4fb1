use std::fs;
use std::path::{Path, PathBuf};

use crate::fs_op::copy::{copy_with, force_copy_with, TransferOptions, TransferReport};
use crate::fs_op::error::{FsOpError, Outcome, Warning};
use crate::fs_op::path::split_file_name;
use crate::fs_op::remove::delete;
use crate::fs_op::stat::PathType;

/// Rename `path` within its parent directory.
///
/// When `path` is a file with an extension and `new_name` has none, the old
/// extension is carried over (`report.txt` renamed to `final` becomes
/// `final.txt`). Returns the new path.
///
/// A missing `path` only raises [`Warning::NotFound`] and renames nothing.
/// An existing destination raises [`Warning::AlreadyExists`]; the rename is
/// still attempted and the platform decides whether it replaces the target.
/// Failures of the rename itself are hard errors.
pub fn rename(path: &Path, new_name: &str) -> Result<Outcome<PathBuf>, FsOpError> {
    let old_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| FsOpError::Message(format!("`{}` has no file name", path.display())))?;

    let kind = PathType::of_link(path);
    let mut name = new_name.to_string();
    if kind != PathType::Directory {
        if let ((_, Some(ext)), (_, None)) = (split_file_name(&old_name), split_file_name(new_name)) {
            name.push('.');
            name.push_str(ext);
        }
    }

    let mut outcome = Outcome::new(path.with_file_name(&name));
    if !kind.exists() {
        outcome.warn(Warning::NotFound(path.to_path_buf()));
        return Ok(outcome);
    }
    if PathType::of_link(&outcome.value).exists() {
        let existing = outcome.value.clone();
        outcome.warn(Warning::AlreadyExists(existing));
    }

    fs::rename(path, &outcome.value)?;
    tracing::debug!("renamed {} to {}", path.display(), outcome.value.display());
    Ok(outcome)
}

/// Copy `src` into `dest_dir` with rollback, then delete `src`.
///
/// The source is only deleted when the copy succeeded *and* skipped no
/// colliding files; otherwise it is left untouched so nothing is lost.
/// Problems deleting the source come back as warnings.
pub fn move_to(src: &Path, dest_dir: &Path) -> Result<Outcome<TransferReport>, FsOpError> {
    move_to_with(src, dest_dir, &TransferOptions::default())
}

pub fn move_to_with(
    src: &Path,
    dest_dir: &Path,
    options: &TransferOptions,
) -> Result<Outcome<TransferReport>, FsOpError> {
    let outcome = copy_with(src, dest_dir, options)?;
    Ok(finish_move(src, outcome))
}

/// Forced copy of `src` into `dest_dir`, then delete `src`.
///
/// Same deletion rule as [`move_to`]: with `overwrite == false` any kept
/// destination file means the source stays.
pub fn force_move(
    src: &Path,
    dest_dir: &Path,
    overwrite: bool,
) -> Result<Outcome<TransferReport>, FsOpError> {
    force_move_with(src, dest_dir, overwrite, &TransferOptions::default())
}

pub fn force_move_with(
    src: &Path,
    dest_dir: &Path,
    overwrite: bool,
    options: &TransferOptions,
) -> Result<Outcome<TransferReport>, FsOpError> {
    let outcome = force_copy_with(src, dest_dir, overwrite, options)?;
    Ok(finish_move(src, outcome))
}

fn finish_move(src: &Path, mut outcome: Outcome<TransferReport>) -> Outcome<TransferReport> {
    if !outcome.value.skipped.is_empty() {
        tracing::warn!(
            "{} destination files were kept, leaving {} in place",
            outcome.value.skipped.len(),
            src.display()
        );
        return outcome;
    }
    outcome.absorb(delete(src));
    outcome
}
