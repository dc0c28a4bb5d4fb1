//! TOML configuration for the file helpers.
//!
//! Every key is optional:
//!
//! ```toml
//! buffer_size = 524288   # bytes per stream-copy chunk
//! charset = "UTF-8"      # default charset for text reads and writes
//! max_depth = 256        # deepest directory nesting a walk accepts
//! log_filter = "info"    # tracing filter when RUST_LOG is unset
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fs_op::copy::TransferOptions;
use crate::fs_op::list::DEFAULT_MAX_DEPTH;
use crate::fs_op::stream::{lookup_charset, DEFAULT_BUFFER_SIZE, DEFAULT_CHARSET};

pub const CONFIG_FILE_NAME: &str = "fsutil.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    pub buffer_size: usize,
    pub charset: String,
    pub max_depth: usize,
    pub log_filter: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        FsConfig {
            buffer_size: DEFAULT_BUFFER_SIZE,
            charset: DEFAULT_CHARSET.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            log_filter: "info".to_string(),
        }
    }
}

/// Per-user config file location, e.g. `~/.config/fsutil/fsutil.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "fsutil").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl FsConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: FsConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `explicit` if given (it must exist), else the per-user file if
    /// present, else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be positive".into()));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be positive".into()));
        }
        lookup_charset(&self.charset)
            .map_err(|_| ConfigError::Invalid(format!("unknown charset `{}`", self.charset)))?;
        Ok(())
    }

    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            buffer_size: self.buffer_size,
            max_depth: self.max_depth,
        }
    }
}
