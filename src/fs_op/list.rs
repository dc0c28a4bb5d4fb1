use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::fs_op::error::FsOpError;
use crate::fs_op::path::ExtensionSet;
use crate::fs_op::stat::PathType;

/// Deepest nesting (relative to the walk root) any tree walk will enter.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Iterate `root` and everything below it, sorted by name per directory.
///
/// The root itself comes first (depth 0) and every directory precedes its
/// contents. Symlinks are followed; walkdir reports link loops as errors.
/// Entries nested deeper than `max_depth` turn into
/// [`FsOpError::DepthLimit`] instead of being silently skipped.
pub(crate) fn bounded_walk(
    root: &Path,
    max_depth: usize,
) -> impl Iterator<Item = Result<DirEntry, FsOpError>> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .max_depth(max_depth.saturating_add(1))
        .into_iter()
        .map(move |entry| -> Result<DirEntry, FsOpError> {
            let entry = entry?;
            if entry.depth() > max_depth {
                return Err(FsOpError::DepthLimit {
                    path: entry.into_path(),
                    limit: max_depth,
                });
            }
            Ok(entry)
        })
}

/// Every file under `dir` whose name passes `extensions`.
///
/// Directories are always descended into; only files are returned. Passing
/// [`ExtensionSet::any`] lists the whole tree.
pub fn list_files(dir: &Path, extensions: &ExtensionSet) -> Result<Vec<PathBuf>, FsOpError> {
    list_files_to_depth(dir, extensions, DEFAULT_MAX_DEPTH)
}

pub fn list_files_to_depth(
    dir: &Path,
    extensions: &ExtensionSet,
    max_depth: usize,
) -> Result<Vec<PathBuf>, FsOpError> {
    match PathType::of(dir) {
        PathType::Directory => {}
        PathType::NotFound => return Err(FsOpError::NotFound(dir.to_path_buf())),
        _ => return Err(FsOpError::NotADirectory(dir.to_path_buf())),
    }

    let mut files = Vec::new();
    for entry in bounded_walk(dir, max_depth).skip(1) {
        let entry = entry?;
        if entry.file_type().is_file() && extensions.matches(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }
    tracing::debug!("listed {} files under {}", files.len(), dir.display());
    Ok(files)
}
