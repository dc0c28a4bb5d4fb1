//! Tree copies: plan first, then execute while recording what was created.
//!
//! A transfer always lands *inside* the destination directory: copying
//! `photos/` into `backup/` produces `backup/photos/...`. Two modes exist:
//!
//! - [`TransferMode::Checked`] never touches existing destination files
//!   (collisions are skipped with a warning) and, on failure, deletes every
//!   path it created before returning [`FsOpError::Transfer`].
//! - [`TransferMode::Force`] overwrites or skips existing files depending on
//!   its flag and leaves partial work in place when it fails.

use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::fs_op::error::{FsOpError, Outcome, Warning};
use crate::fs_op::list::{bounded_walk, DEFAULT_MAX_DEPTH};
use crate::fs_op::remove::delete;
use crate::fs_op::stat::PathType;
use crate::fs_op::stream::{copy_file, stream_copy, DEFAULT_BUFFER_SIZE};

/// Tunables shared by every tree transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Chunk size handed to [`stream_copy`].
    pub buffer_size: usize,
    /// Deepest source nesting the planner accepts.
    pub max_depth: usize,
}

impl Default for TransferOptions {
    fn default() -> Self {
        TransferOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Skip existing files, roll back on failure.
    Checked,
    /// Replace (or keep) existing files, no rollback.
    Force { overwrite: bool },
}

/// One planned side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStep {
    CreateDir(PathBuf),
    CopyFile { src: PathBuf, dst: PathBuf },
}

/// What a finished transfer did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Paths created by this transfer, in creation order.
    pub created: Vec<PathBuf>,
    /// Existing files replaced by a forced transfer.
    pub overwritten: Vec<PathBuf>,
    /// Existing files left untouched.
    pub skipped: Vec<PathBuf>,
    pub bytes_copied: u64,
}

/// Paths created by the running transfer, in creation order.
#[derive(Debug, Default)]
struct TransferRecord {
    created: Vec<PathBuf>,
}

impl TransferRecord {
    fn push(&mut self, path: PathBuf) {
        tracing::debug!("created {}", path.display());
        self.created.push(path);
    }

    /// Delete every recorded path, oldest first, never failing.
    ///
    /// Returns `(removed, left_behind)`. Deleting a recorded directory takes
    /// its recorded children with it; those count as removed.
    fn rollback(self) -> (usize, usize) {
        for path in &self.created {
            if PathType::of_link(path).exists() {
                // Failures are counted below by re-checking existence.
                let _ = delete(path);
            }
        }
        let left = self
            .created
            .iter()
            .filter(|p| PathType::of_link(p).exists())
            .count();
        (self.created.len() - left, left)
    }
}

/// The ordered list of steps a transfer of `src` into `dest_dir` will take.
///
/// Building a plan has no side effects. Directories always precede their
/// contents and siblings are ordered by name.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    src: PathBuf,
    dest_dir: PathBuf,
    steps: Vec<TransferStep>,
}

impl TransferPlan {
    /// Walk `src` and plan its transfer into the existing `dest_dir`.
    pub fn build(src: &Path, dest_dir: &Path, max_depth: usize) -> Result<Self, FsOpError> {
        match PathType::of(dest_dir) {
            PathType::Directory => {}
            PathType::NotFound => return Err(FsOpError::NotFound(dest_dir.to_path_buf())),
            _ => return Err(FsOpError::NotADirectory(dest_dir.to_path_buf())),
        }
        let name = src.file_name().ok_or_else(|| {
            FsOpError::Message(format!("`{}` has no file name", src.display()))
        })?;
        reject_overlap(src, dest_dir, name)?;
        let target = dest_dir.join(name);

        let mut steps = Vec::new();
        match PathType::of(src) {
            PathType::File => steps.push(TransferStep::CopyFile {
                src: src.to_path_buf(),
                dst: target,
            }),
            PathType::Directory => {
                for entry in bounded_walk(src, max_depth) {
                    let entry = entry?;
                    let rel = entry.path().strip_prefix(src).map_err(|_| {
                        FsOpError::Message(format!(
                            "`{}` escaped the walk root `{}`",
                            entry.path().display(),
                            src.display()
                        ))
                    })?;
                    let dst = if rel.as_os_str().is_empty() {
                        target.clone()
                    } else {
                        target.join(rel)
                    };
                    let ft = entry.file_type();
                    if ft.is_dir() {
                        steps.push(TransferStep::CreateDir(dst));
                    } else if ft.is_file() {
                        steps.push(TransferStep::CopyFile {
                            src: entry.into_path(),
                            dst,
                        });
                    } else {
                        tracing::debug!("skipping special file {}", entry.path().display());
                    }
                }
            }
            PathType::NotFound => return Err(FsOpError::NotFound(src.to_path_buf())),
            PathType::Other => {
                return Err(FsOpError::Message(format!(
                    "`{}` is neither a file nor a directory",
                    src.display()
                )))
            }
        }

        Ok(TransferPlan {
            src: src.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
            steps,
        })
    }

    pub fn steps(&self) -> &[TransferStep] {
        &self.steps
    }

    pub fn source(&self) -> &Path {
        &self.src
    }

    /// Destination directory the source lands in.
    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Carry out the plan.
    ///
    /// In [`TransferMode::Checked`] a failure rolls back everything this call
    /// created and is returned as [`FsOpError::Transfer`]. In
    /// [`TransferMode::Force`] the failing step's error is returned as-is and
    /// completed steps stay in place.
    pub fn execute(
        &self,
        mode: TransferMode,
        buffer_size: usize,
    ) -> Result<Outcome<TransferReport>, FsOpError> {
        let mut record = TransferRecord::default();
        let mut outcome = Outcome::new(TransferReport::default());

        match self.run(mode, buffer_size, &mut record, &mut outcome) {
            Ok(()) => {
                outcome.value.created = record.created;
                tracing::debug!(
                    "transferred {} into {} ({} bytes)",
                    self.src.display(),
                    self.dest_dir.display(),
                    outcome.value.bytes_copied
                );
                Ok(outcome)
            }
            Err(cause) => match mode {
                TransferMode::Checked => {
                    let (rolled_back, rollback_failures) = record.rollback();
                    tracing::warn!(
                        "transfer of {} failed, rolled back {} paths ({} left behind): {}",
                        self.src.display(),
                        rolled_back,
                        rollback_failures,
                        cause
                    );
                    Err(FsOpError::Transfer {
                        src: self.src.clone(),
                        dst: self.dest_dir.clone(),
                        rolled_back,
                        rollback_failures,
                        cause: Box::new(cause),
                    })
                }
                TransferMode::Force { .. } => {
                    tracing::warn!(
                        "forced transfer of {} failed after creating {} paths: {}",
                        self.src.display(),
                        record.created.len(),
                        cause
                    );
                    Err(cause)
                }
            },
        }
    }

    fn run(
        &self,
        mode: TransferMode,
        buffer_size: usize,
        record: &mut TransferRecord,
        outcome: &mut Outcome<TransferReport>,
    ) -> Result<(), FsOpError> {
        for step in &self.steps {
            match step {
                TransferStep::CreateDir(dst) => match PathType::of(dst) {
                    PathType::Directory => tracing::debug!("reusing {}", dst.display()),
                    PathType::NotFound => {
                        fs::create_dir(dst)?;
                        record.push(dst.clone());
                    }
                    _ => return Err(FsOpError::NotADirectory(dst.clone())),
                },
                TransferStep::CopyFile { src, dst } => {
                    if PathType::of_link(dst).exists() {
                        match mode {
                            TransferMode::Force { overwrite: true } => {
                                outcome.value.bytes_copied += copy_file(src, dst, buffer_size)?;
                                outcome.value.overwritten.push(dst.clone());
                            }
                            TransferMode::Force { overwrite: false } => {
                                outcome.value.skipped.push(dst.clone());
                            }
                            TransferMode::Checked => {
                                outcome.warn(Warning::AlreadyExists(dst.clone()));
                                outcome.value.skipped.push(dst.clone());
                            }
                        }
                        continue;
                    }
                    outcome.value.bytes_copied += copy_new_file(src, dst, buffer_size, record)?;
                }
            }
        }
        Ok(())
    }
}

/// Fail when `dest_dir/name` is `src` or lies somewhere below it.
///
/// Both sides are resolved first so `.`/`..` components and symlinks can't
/// hide the overlap.
fn reject_overlap(src: &Path, dest_dir: &Path, name: &OsStr) -> Result<(), FsOpError> {
    let src_real = match fs::canonicalize(src) {
        Ok(p) => p,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FsOpError::NotFound(src.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    let target_real = fs::canonicalize(dest_dir)?.join(name);
    if target_real.starts_with(&src_real) {
        return Err(FsOpError::Overlap {
            src: src.to_path_buf(),
            target: dest_dir.join(name),
        });
    }
    Ok(())
}

/// Copy `src` to a not-yet-existing `dst`, recording `dst` once it exists.
///
/// The destination is recorded before any byte is written so a transfer
/// that dies mid-file still rolls the partial file back.
fn copy_new_file(
    src: &Path,
    dst: &Path,
    buffer_size: usize,
    record: &mut TransferRecord,
) -> Result<u64, FsOpError> {
    let context = |err: FsOpError| FsOpError::Copy {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source: Box::new(err),
    };
    let input = File::open(src).map_err(|e| context(e.into()))?;
    let output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)
        .map_err(|e| context(e.into()))?;
    record.push(dst.to_path_buf());
    stream_copy(input, output, buffer_size).map_err(context)
}

/// Copy `src` (file or directory) into the existing directory `dest_dir`.
///
/// Existing destination files are never overwritten: each collision is
/// skipped with [`Warning::AlreadyExists`]. If anything fails, every path
/// created so far is deleted and [`FsOpError::Transfer`] is returned.
pub fn copy(src: &Path, dest_dir: &Path) -> Result<Outcome<TransferReport>, FsOpError> {
    copy_with(src, dest_dir, &TransferOptions::default())
}

pub fn copy_with(
    src: &Path,
    dest_dir: &Path,
    options: &TransferOptions,
) -> Result<Outcome<TransferReport>, FsOpError> {
    TransferPlan::build(src, dest_dir, options.max_depth)?
        .execute(TransferMode::Checked, options.buffer_size)
}

/// Copy `src` into `dest_dir`, replacing existing files when `overwrite`.
///
/// There is no rollback: if a step fails, whatever was already copied stays.
pub fn force_copy(
    src: &Path,
    dest_dir: &Path,
    overwrite: bool,
) -> Result<Outcome<TransferReport>, FsOpError> {
    force_copy_with(src, dest_dir, overwrite, &TransferOptions::default())
}

pub fn force_copy_with(
    src: &Path,
    dest_dir: &Path,
    overwrite: bool,
    options: &TransferOptions,
) -> Result<Outcome<TransferReport>, FsOpError> {
    TransferPlan::build(src, dest_dir, options.max_depth)?
        .execute(TransferMode::Force { overwrite }, options.buffer_size)
}
