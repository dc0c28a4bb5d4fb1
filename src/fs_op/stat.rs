use std::fs;
use std::path::Path;

/// Kind of a path as the filesystem reports it at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// Nothing exists at the path (or its metadata cannot be read).
    NotFound,
    Directory,
    File,
    /// Neither a regular file nor a directory (socket, FIFO, device...).
    Other,
}

impl PathType {
    /// Classify `path`, following symlinks.
    ///
    /// A single `metadata` call backs the answer so callers branching on the
    /// kind don't race between separate `exists`/`is_dir` checks.
    pub fn of<P: AsRef<Path>>(path: P) -> Self {
        match fs::metadata(path.as_ref()) {
            Err(_) => PathType::NotFound,
            Ok(md) if md.is_dir() => PathType::Directory,
            Ok(md) if md.is_file() => PathType::File,
            Ok(_) => PathType::Other,
        }
    }

    /// Classify `path` without following a trailing symlink.
    ///
    /// Used by deletion so removing a link never touches its target.
    pub fn of_link<P: AsRef<Path>>(path: P) -> Self {
        match fs::symlink_metadata(path.as_ref()) {
            Err(_) => PathType::NotFound,
            Ok(md) if md.is_dir() => PathType::Directory,
            Ok(md) if md.is_file() => PathType::File,
            Ok(_) => PathType::Other,
        }
    }

    pub fn exists(self) -> bool {
        self != PathType::NotFound
    }
}
