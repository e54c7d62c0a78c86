use super::backend::SlotBackend;
use super::persistence::Persistence;
use crate::error::Result;
use crate::ids::IdGenerator;
use crate::model::{Collection, Document, Flag, Record, RecordId, Theme};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Owns the one in-memory [`Document`] and keeps the slot in step with it.
///
/// Every mutation is staged on a copy of the document, written to the slot, and
/// only then committed. If the write fails, the error is returned and both the
/// in-memory document and the slot still hold the previous state.
pub struct DocumentStore<B: SlotBackend> {
    document: Document,
    persistence: Persistence<B>,
    ids: IdGenerator,
}

impl<B: SlotBackend> DocumentStore<B> {
    /// Load the document from `backend`.
    pub fn open(backend: B) -> Result<Self> {
        Self::open_with_ids(backend, IdGenerator::new())
    }

    pub fn open_with_ids(backend: B, ids: IdGenerator) -> Result<Self> {
        let persistence = Persistence::new(backend);
        let document = persistence.load(&ids)?;
        Ok(Self {
            document,
            persistence,
            ids,
        })
    }

    /// Start from an empty document without reading the slot.
    ///
    /// This is the recovery path once the user has agreed to abandon corrupt saved
    /// data. The slot is left untouched until the next mutation overwrites it.
    pub fn open_with_defaults(backend: B) -> Self {
        let persistence = Persistence::new(backend);
        debug!(
            slot = %persistence.backend().location(),
            "starting from an empty tracker; saved data will be overwritten on the next change"
        );
        Self {
            document: Document::default(),
            persistence,
            ids: IdGenerator::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn backend(&self) -> &B {
        self.persistence.backend()
    }

    pub(crate) fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Records of one collection, in insertion order.
    pub fn list<R: Record>(&self) -> &[R] {
        R::items(&self.document)
    }

    pub fn get<R: Record>(&self, id: &RecordId) -> Option<&R> {
        R::items(&self.document).iter().find(|r| r.id() == id)
    }

    /// Insert or replace a record.
    ///
    /// - Unassigned id: a fresh id is generated and the record is appended.
    /// - Id of an existing record: that record is replaced in place.
    /// - Any other id: the record is appended with the id it carries.
    ///
    /// Blank required text is rejected before anything changes. Inventory
    /// quantities below zero are stored as zero.
    pub fn upsert<R: Record>(&mut self, mut record: R) -> Result<R> {
        record.validate()?;
        record.normalize();
        if record.id().is_unassigned() {
            record.set_id(self.ids.generate());
        }

        let mut next = self.document.clone();
        let items = R::items_mut(&mut next);
        match items.iter().position(|r| r.id() == record.id()) {
            Some(index) => items[index] = record.clone(),
            None => items.push(record.clone()),
        }

        self.commit(next)?;
        debug!(collection = %R::COLLECTION, id = %record.id(), "saved record");
        Ok(record)
    }

    /// Remove a record. Returns whether one was removed; unknown ids are a no-op.
    pub fn remove<R: Record>(&mut self, id: &RecordId) -> Result<bool> {
        self.remove_in(R::COLLECTION, id)
    }

    pub fn remove_in(&mut self, collection: Collection, id: &RecordId) -> Result<bool> {
        let mut next = self.document.clone();
        if !next.remove(collection, id) {
            return Ok(false);
        }
        self.commit(next)?;
        debug!(collection = %collection, id = %id, "removed record");
        Ok(true)
    }

    /// Remove several records with a single write. Returns how many were removed;
    /// if the write fails, none are.
    pub fn remove_all_in(&mut self, collection: Collection, ids: &[RecordId]) -> Result<usize> {
        let mut next = self.document.clone();
        let removed = ids.iter().filter(|id| next.remove(collection, id)).count();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(next)?;
        debug!(collection = %collection, removed, "removed records");
        Ok(removed)
    }

    /// Flip a boolean field. Returns the new value, or `None` (and changes nothing)
    /// when no record has that id.
    pub fn toggle<R: Record>(&mut self, id: &RecordId, flag: Flag) -> Result<Option<bool>> {
        self.toggle_in(R::COLLECTION, id, flag)
    }

    pub fn toggle_in(
        &mut self,
        collection: Collection,
        id: &RecordId,
        flag: Flag,
    ) -> Result<Option<bool>> {
        let mut next = self.document.clone();
        let Some(value) = next.toggle(collection, id, flag)? else {
            return Ok(None);
        };
        self.commit(next)?;
        Ok(Some(value))
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        let mut next = self.document.clone();
        next.settings.theme = theme;
        self.commit(next)
    }

    pub fn set_last_export(&mut self, at: DateTime<Utc>) -> Result<()> {
        let mut next = self.document.clone();
        next.settings.last_export = Some(at);
        self.commit(next)
    }

    /// Replace the whole document.
    pub fn replace(&mut self, document: Document) -> Result<()> {
        self.commit(document)
    }

    /// Erase the slot and start over with an empty document, which is then saved.
    ///
    /// Once the erase has succeeded the in-memory document is empty even if saving
    /// the empty state fails: an absent slot already loads as the empty document.
    pub fn reset(&mut self) -> Result<()> {
        self.persistence.erase()?;
        self.document = Document::default();
        self.persistence.store(&self.document)
    }

    fn commit(&mut self, next: Document) -> Result<()> {
        self.persistence.store(&next)?;
        self.document = next;
        Ok(())
    }
}
