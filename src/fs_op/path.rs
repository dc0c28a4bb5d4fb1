//! Name parsing and path-string helpers.
//!
//! File names are split at the *last* `.`: `archive.tar.gz` has base name
//! `archive.tar` and extension `gz`, and a dot file such as `.profile` has
//! an empty base name and extension `profile`. A name without a dot has no
//! extension at all.

use std::collections::BTreeSet;
use std::path::{Path, MAIN_SEPARATOR};

use crate::fs_op::stat::PathType;

/// Split a bare file name into `(base, extension)` at the last `.`.
pub fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
        None => (name, None),
    }
}

fn file_name_lossy(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Base name of `path` as the filesystem currently sees it.
///
/// Files lose their extension (and surrounding whitespace); directories
/// report their full name. Returns `None` when the path is neither.
pub fn base_name<P: AsRef<Path>>(path: P) -> Option<String> {
    let p = path.as_ref();
    match PathType::of(p) {
        PathType::File => {
            let name = file_name_lossy(p)?;
            let (base, _) = split_file_name(&name);
            Some(base.trim().to_string())
        }
        PathType::Directory => file_name_lossy(p),
        _ => {
            tracing::warn!("not a file or directory: {}", p.display());
            None
        }
    }
}

/// Extension of the file at `path`, without the leading dot.
///
/// A file without a dot yields `Some("")`. Directories and missing paths
/// yield `None`.
pub fn extension<P: AsRef<Path>>(path: P) -> Option<String> {
    let p = path.as_ref();
    match PathType::of(p) {
        PathType::File => {
            let name = file_name_lossy(p)?;
            let (_, ext) = split_file_name(&name);
            Some(ext.unwrap_or_default().to_string())
        }
        PathType::Directory => None,
        _ => {
            tracing::warn!("not a file: {}", p.display());
            None
        }
    }
}

/// Rewrite the foreign separator of `path` to the host separator.
///
/// On Unix hosts `\` becomes `/`; on Windows `/` becomes `\`.
pub fn normalize_separators(path: &str) -> String {
    let foreign = if MAIN_SEPARATOR == '/' { '\\' } else { '/' };
    if !path.contains(foreign) {
        return path.to_string();
    }
    path.chars()
        .map(|c| if c == foreign { MAIN_SEPARATOR } else { c })
        .collect()
}

/// Set of file extensions used to filter directory listings.
///
/// Entries are compared case-sensitively against the text after the last
/// `.` of a file name. One leading dot is dropped when the set is built, so
/// `".txt"` and `"txt"` are the same entry. The empty set accepts every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    exts: BTreeSet<String>,
}

impl ExtensionSet {
    /// The empty filter, which matches everything.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exts.len()
    }

    /// Whether a file called `file_name` passes the filter.
    pub fn matches(&self, file_name: &str) -> bool {
        if self.exts.is_empty() {
            return true;
        }
        match split_file_name(file_name) {
            (_, Some(ext)) => self.exts.contains(ext),
            (_, None) => false,
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ExtensionSet {
            exts: iter
                .into_iter()
                .map(|ext| {
                    let ext: String = ext.into();
                    match ext.strip_prefix('.') {
                        Some(bare) => bare.to_string(),
                        None => ext,
                    }
                })
                .collect(),
        }
    }
}
