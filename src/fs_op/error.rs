use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Hard failures produced by filesystem operation helpers.
///
/// Anything that should abort the current operation (and trigger rollback
/// for `copy`/`move_to`) is reported through this type. Soft anomalies are
/// reported as [`Warning`]s instead.
#[derive(Error, Debug)]
pub enum FsOpError {
    /// Wrapper for underlying IO errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with context message.
    #[error("Filesystem operation failed: {0}")]
    Message(String),

    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Low-level failure while pumping bytes between two streams.
    #[error("stream transfer failed: {0}")]
    Stream(#[source] io::Error),

    /// Single-file copy failure with source and destination context.
    #[error("copy from `{}` to `{}` failed: {source}", .src.display(), .dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: Box<FsOpError>,
    },

    /// Composite failure of a tree transfer, raised after rollback ran.
    #[error(
        "transfer of `{}` into `{}` failed ({rolled_back} created paths rolled back, {rollback_failures} left behind): {cause}",
        .src.display(),
        .dst.display()
    )]
    Transfer {
        src: PathBuf,
        dst: PathBuf,
        rolled_back: usize,
        rollback_failures: usize,
        #[source]
        cause: Box<FsOpError>,
    },

    /// The transfer target is the source itself or lies inside it.
    #[error("cannot transfer `{}` into itself (target `{}`)", .src.display(), .target.display())]
    Overlap { src: PathBuf, target: PathBuf },

    #[error("`{}` is deeper than the walk limit of {limit}", .path.display())]
    DepthLimit { path: PathBuf, limit: usize },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("unknown charset label: {0}")]
    UnknownCharset(String),
}

impl From<String> for FsOpError {
    fn from(s: String) -> Self {
        FsOpError::Message(s)
    }
}

/// A soft anomaly: the operation carried on, but the caller may care.
///
/// Every warning is logged via `tracing` when it is raised and returned to
/// the caller inside an [`Outcome`].
#[derive(Debug)]
pub enum Warning {
    NotFound(PathBuf),
    AlreadyExists(PathBuf),
    NotADirectory(PathBuf),
    DeleteFailed { path: PathBuf, source: io::Error },
    Unreadable { path: PathBuf, source: io::Error },
}

impl Warning {
    /// Path the warning is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Warning::NotFound(p) | Warning::AlreadyExists(p) | Warning::NotADirectory(p) => p,
            Warning::DeleteFailed { path, .. } | Warning::Unreadable { path, .. } => path,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NotFound(p) => write!(f, "does not exist: {}", p.display()),
            Warning::AlreadyExists(p) => write!(f, "already exists: {}", p.display()),
            Warning::NotADirectory(p) => write!(f, "not a directory: {}", p.display()),
            Warning::DeleteFailed { path, source } => {
                write!(f, "failed to delete {}: {}", path.display(), source)
            }
            Warning::Unreadable { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
        }
    }
}

/// Result value of an operation together with the warnings it raised.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    pub fn new(value: T) -> Self {
        Outcome { value, warnings: Vec::new() }
    }

    /// Log `warning` and keep it.
    pub(crate) fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub(crate) fn absorb<U>(&mut self, other: Outcome<U>) -> U {
        self.warnings.extend(other.warnings);
        other.value
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
