//! File and directory operations.
//!
//! Each submodule owns one concern; the most common entry points are
//! re-exported here so callers can `use fsutil::fs_op::{copy, delete, ...}`.
//!
//! Error policy: operations that move data (`copy`, `move_to`, the text
//! readers and writers, `list_files`) return [`FsOpError`] on failure.
//! Housekeeping operations (`delete`, `clean`, `rename`, `make_directory`)
//! report anomalies as [`Warning`]s inside an [`Outcome`] and log them via
//! `tracing`; `delete` and `clean` never fail at all, so a caller that
//! ignores the warnings cannot tell whether a tree was fully removed.

pub mod copy;
pub mod create;
pub mod error;
pub mod list;
pub mod mv;
pub mod path;
pub mod remove;
pub mod stat;
pub mod stream;

pub use copy::{
    copy, copy_with, force_copy, force_copy_with, TransferMode, TransferOptions, TransferPlan,
    TransferReport, TransferStep,
};
pub use create::{make_dir, make_directory};
pub use error::{FsOpError, Outcome, Warning};
pub use list::{list_files, list_files_to_depth, DEFAULT_MAX_DEPTH};
pub use mv::{force_move, force_move_with, move_to, move_to_with, rename};
pub use path::{base_name, extension, normalize_separators, split_file_name, ExtensionSet};
pub use remove::{clean, delete};
pub use stat::PathType;
pub use stream::{
    copy_file, copy_file_to_writer, copy_reader_to_file, count_lines, read_all_lines,
    read_all_lines_with, read_as_text, read_as_text_with, read_lines_from, stream_copy,
    write_text, write_text_encoded, write_text_to, DEFAULT_BUFFER_SIZE, DEFAULT_CHARSET,
    LINE_TERMINATOR,
};
