pub mod collection;
pub mod config;
pub mod fs_op;
pub mod logging;

pub use crate::config::FsConfig;
pub use crate::fs_op::{FsOpError, Outcome, Warning};
