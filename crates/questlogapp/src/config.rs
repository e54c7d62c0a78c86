//! # Configuration
//!
//! Questlog configuration is loaded with [`confique`] from, in priority order:
//!
//! 1. **Environment variables**: `QUESTLOG_DATA_DIR`, `QUESTLOG_SLOT_KEY`,
//!    `QUESTLOG_EXPORT_PREFIX`.
//! 2. **Config file**: `questlog.toml` in the OS config directory (via the
//!    `directories` crate).
//! 3. **Compiled defaults**.
//!
//! A missing config file is fine. A config file that cannot be parsed is an error.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Directory holding the saved tracker data |
//! | `slot_key` | `questlog-tracker-data` | Name of the save slot; the file is `<slot_key>.json` |
//! | `export_prefix` | `questlog-tracker` | Start of export file names |

use crate::error::{Result, TrackerError};
use confique::Config;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "questlog.toml";
pub const DEFAULT_SLOT_KEY: &str = "questlog-tracker-data";
pub const DEFAULT_EXPORT_PREFIX: &str = "questlog-tracker";

#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Directory holding the save slot. Unset means the OS data directory.
    #[config(env = "QUESTLOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[config(env = "QUESTLOG_SLOT_KEY", default = "questlog-tracker-data")]
    pub slot_key: String,

    #[config(env = "QUESTLOG_EXPORT_PREFIX", default = "questlog-tracker")]
    pub export_prefix: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Load from the environment and `<config_dir>/questlog.toml`.
    pub fn load(config_dir: Option<&Path>) -> Result<Self> {
        let mut builder = TrackerConfig::builder().env();
        if let Some(dir) = config_dir {
            builder = builder.file(dir.join(CONFIG_FILE_NAME));
        }
        builder
            .load()
            .map_err(|e| TrackerError::Config(e.to_string()))
    }

    /// Load from a single file, ignoring the environment.
    pub fn load_file(path: &Path) -> Result<Self> {
        TrackerConfig::builder()
            .file(path)
            .load()
            .map_err(|e| TrackerError::Config(e.to_string()))
    }
}
