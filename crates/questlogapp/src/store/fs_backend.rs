use super::backend::SlotBackend;
use crate::error::{Result, TrackerError};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Keeps the slot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FsBackend {
    dir: PathBuf,
    key: String,
}

impl FsBackend {
    pub fn new(dir: PathBuf, key: impl Into<String>) -> Self {
        Self {
            dir,
            key: key.into(),
        }
    }

    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn persistence_error(&self, source: std::io::Error) -> TrackerError {
        TrackerError::Persistence {
            slot: self.location(),
            source,
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| self.persistence_error(e))?;
        }
        Ok(())
    }
}

impl SlotBackend for FsBackend {
    fn read(&self) -> Result<Option<String>> {
        let path = self.slot_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(TrackerError::Io)?;
        let content = String::from_utf8(bytes).map_err(|e| TrackerError::CorruptData {
            slot: self.location(),
            reason: e.to_string(),
        })?;
        Ok(Some(content))
    }

    fn write(&self, contents: &str) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write
        let tmp_path = self
            .dir
            .join(format!(".{}-{}.tmp", self.key, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, contents) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.persistence_error(e));
        }
        fs::rename(&tmp_path, self.slot_path()).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            self.persistence_error(e)
        })?;

        Ok(())
    }

    fn erase(&self) -> Result<()> {
        let path = self.slot_path();
        if path.exists() {
            fs::remove_file(path).map_err(|e| self.persistence_error(e))?;
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.slot_path().display().to_string()
    }
}
