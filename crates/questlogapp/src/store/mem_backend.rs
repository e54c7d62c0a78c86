use super::backend::SlotBackend;
use crate::error::{Result, TrackerError};
use std::cell::{Cell, RefCell};
use std::io;

/// In-memory slot for testing.
///
/// Uses `RefCell` for interior mutability since the tracker is single-threaded,
/// which lets `SlotBackend` take `&self` everywhere.
#[derive(Default)]
pub struct MemBackend {
    contents: RefCell<Option<String>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose slot already holds `contents` (e.g. a blob from an older version).
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let backend = Self::default();
        *backend.contents.borrow_mut() = Some(contents.into());
        backend
    }

    /// Make every following write and erase fail, as a full or unavailable storage would.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Raw slot contents, exactly as last written.
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(TrackerError::Persistence {
                slot: self.location(),
                source: io::Error::new(io::ErrorKind::Other, "simulated write error"),
            });
        }
        Ok(())
    }
}

impl SlotBackend for MemBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.borrow().clone())
    }

    fn write(&self, contents: &str) -> Result<()> {
        self.check_writable()?;
        *self.contents.borrow_mut() = Some(contents.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn erase(&self) -> Result<()> {
        self.check_writable()?;
        *self.contents.borrow_mut() = None;
        Ok(())
    }

    fn location(&self) -> String {
        "memory://slot".to_string()
    }
}
