use super::backend::SlotBackend;
use crate::error::{Result, TrackerError};
use crate::ids::IdGenerator;
use crate::model::Document;
use crate::reconcile::{reconcile, ReconcileReport};
use serde_json::Value;
use tracing::{debug, warn};

/// Round-trips a [`Document`] through a [`SlotBackend`].
pub struct Persistence<B: SlotBackend> {
    backend: B,
}

impl<B: SlotBackend> Persistence<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the document, filling in defaults for anything the slot lacks.
    ///
    /// An absent or empty slot yields the empty default document. A slot that is not a JSON
    /// object is [`TrackerError::CorruptData`]; it is never silently replaced.
    pub fn load(&self, ids: &IdGenerator) -> Result<Document> {
        let (doc, report) = self.load_reconciled(ids)?;
        if !report.is_clean() {
            warn!(
                slot = %self.backend.location(),
                dropped = report.dropped_records,
                duplicates = report.duplicate_ids,
                assigned_ids = report.assigned_ids,
                defaulted = ?report.defaulted_fields,
                "saved data needed repairs while loading"
            );
        }
        Ok(doc)
    }

    /// Like [`Persistence::load`], also returning what had to be repaired.
    pub fn load_reconciled(&self, ids: &IdGenerator) -> Result<(Document, ReconcileReport)> {
        let raw = match self.backend.read()? {
            // An empty slot holds nothing, same as an absent one
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                debug!(slot = %self.backend.location(), "no saved data, starting fresh");
                return Ok((Document::default(), ReconcileReport::default()));
            }
        };

        let value: Value = serde_json::from_str(&raw).map_err(|e| TrackerError::CorruptData {
            slot: self.backend.location(),
            reason: e.to_string(),
        })?;
        let Value::Object(root) = value else {
            return Err(TrackerError::CorruptData {
                slot: self.backend.location(),
                reason: "expected a JSON object".to_string(),
            });
        };

        debug!(slot = %self.backend.location(), "loaded saved data");
        Ok(reconcile(&root, ids))
    }

    /// Serialize the whole document into the slot.
    pub fn store(&self, doc: &Document) -> Result<()> {
        let contents = serde_json::to_string_pretty(doc)?;
        self.backend.write(&contents)?;
        debug!(slot = %self.backend.location(), bytes = contents.len(), "saved data");
        Ok(())
    }

    /// Remove the slot entirely.
    pub fn erase(&self) -> Result<()> {
        self.backend.erase()?;
        debug!(slot = %self.backend.location(), "erased saved data");
        Ok(())
    }
}
