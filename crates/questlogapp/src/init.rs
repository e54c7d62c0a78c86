//! # Bootstrapping
//!
//! [`initialize`] builds the one [`TrackerApi`] a process works with:
//!
//! 1. Load [`TrackerConfig`] (environment, then `questlog.toml`, then defaults).
//! 2. Pick the data directory: an explicit override wins, then the configured
//!    `data_dir`, then the OS data directory from the `directories` crate.
//! 3. Open the slot `<data_dir>/<slot_key>.json` and load it.
//!
//! ## Corrupt saved data
//!
//! A slot that cannot be read as a tracker document fails initialization with
//! [`TrackerError::CorruptData`]. The data is never thrown away on the library's
//! own initiative: the caller has to ask again with `reset_corrupt = true`, which
//! starts from an empty tracker and overwrites the slot on the next change.

use crate::api::TrackerApi;
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::store::fs_backend::FsBackend;
use crate::store::DocumentStore;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct TrackerContext {
    pub api: TrackerApi<FsBackend>,
    pub config: TrackerConfig,
    pub data_dir: PathBuf,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "questlog", "questlog")
}

/// Directory searched for `questlog.toml`, when the OS has one.
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn default_data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            TrackerError::Config(
                "could not determine a data directory; set QUESTLOG_DATA_DIR".to_string(),
            )
        })
}

/// Load configuration and open the tracker.
///
/// * `data_override` - directory holding the slot, bypassing configuration.
/// * `reset_corrupt` - the user agreed to start over if the saved data is corrupt.
pub fn initialize(data_override: Option<PathBuf>, reset_corrupt: bool) -> Result<TrackerContext> {
    let config = TrackerConfig::load(config_dir().as_deref())?;
    initialize_with(config, data_override, reset_corrupt)
}

/// Like [`initialize`], with configuration already loaded.
pub fn initialize_with(
    config: TrackerConfig,
    data_override: Option<PathBuf>,
    reset_corrupt: bool,
) -> Result<TrackerContext> {
    let data_dir = match data_override.or_else(|| config.data_dir.clone()) {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let backend = FsBackend::new(data_dir.clone(), config.slot_key.clone());
    debug!(slot = %backend.slot_path().display(), "opening tracker");

    let store = match DocumentStore::open(backend.clone()) {
        Ok(store) => store,
        Err(TrackerError::CorruptData { slot, reason }) if reset_corrupt => {
            warn!(slot = %slot, reason = %reason, "discarding corrupt saved data on request");
            DocumentStore::open_with_defaults(backend)
        }
        Err(e) => return Err(e),
    };

    let api = TrackerApi::new(store, config.export_prefix.clone());
    Ok(TrackerContext {
        api,
        config,
        data_dir,
    })
}
