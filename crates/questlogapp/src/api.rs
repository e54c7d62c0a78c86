//! # API Facade
//!
//! [`TrackerApi`] is the single entry point for every tracker operation, whatever
//! the UI. It is a thin layer over [`crate::commands`]:
//!
//! - it **dispatches** to the command functions,
//! - it **normalizes inputs** (string ids into [`RecordId`]s),
//! - it holds the little state that spans calls: the export file prefix and the
//!   import in-flight flag.
//!
//! It never prints, prompts or touches the terminal.
//!
//! ## Import in flight
//!
//! Import is staged ([`TrackerApi::stage_import`]) and later applied or cancelled.
//! Between those calls the API refuses to stage a second import with
//! [`TrackerError::ImportInFlight`]. Applying or cancelling always clears the flag,
//! also when applying fails, so a failed import never blocks the next one.
//!
//! ## Generic over the slot
//!
//! `TrackerApi<B: SlotBackend>` runs against
//! [`FsBackend`](crate::store::fs_backend::FsBackend) in production and
//! [`MemBackend`](crate::store::mem_backend::MemBackend) in tests.
//!
//! ## Testing Strategy
//!
//! API tests check dispatch and the in-flight flag. Command behavior is tested in
//! the command modules, storage behavior in the store modules.

use crate::commands::clear::ClearConsent;
use crate::commands::import::{ImportPlan, OverwriteConsent};
use crate::commands::list::ListFilter;
use crate::commands::{self, CmdMessage, CmdResult};
use crate::error::{Result, TrackerError};
use crate::model::{Collection, Document, Flag, Record, RecordId, Theme};
use crate::store::{DocumentStore, SlotBackend};
use std::fs;
use std::path::Path;
use tracing::info;

pub struct TrackerApi<B: SlotBackend> {
    store: DocumentStore<B>,
    export_prefix: String,
    import_in_flight: bool,
}

impl<B: SlotBackend> TrackerApi<B> {
    pub fn new(store: DocumentStore<B>, export_prefix: impl Into<String>) -> Self {
        Self {
            store,
            export_prefix: export_prefix.into(),
            import_in_flight: false,
        }
    }

    pub fn document(&self) -> &Document {
        self.store.document()
    }

    pub fn store(&self) -> &DocumentStore<B> {
        &self.store
    }

    /// Records of one collection in insertion order, unfiltered.
    pub fn records<R: Record>(&self) -> &[R] {
        self.store.list::<R>()
    }

    pub fn get<R: Record>(&self, id: &str) -> Option<&R> {
        self.store.get::<R>(&RecordId::from(id))
    }

    pub fn list(&self, collection: Collection, filter: &ListFilter) -> Result<CmdResult> {
        commands::list::run(&self.store, collection, filter)
    }

    pub fn save<R: Record>(&mut self, record: R) -> Result<CmdResult> {
        commands::save::run(&mut self.store, record)
    }

    pub fn edit<R, F>(&mut self, id: &str, change: F) -> Result<CmdResult>
    where
        R: Record,
        F: FnOnce(&mut R),
    {
        commands::save::edit(&mut self.store, &RecordId::from(id), change)
    }

    pub fn delete<I: AsRef<str>>(
        &mut self,
        collection: Collection,
        ids: &[I],
    ) -> Result<CmdResult> {
        let ids: Vec<RecordId> = ids.iter().map(|id| RecordId::from(id.as_ref())).collect();
        commands::delete::run(&mut self.store, collection, &ids)
    }

    pub fn toggle(&mut self, collection: Collection, id: &str, flag: Flag) -> Result<CmdResult> {
        commands::toggle::run(&mut self.store, collection, &RecordId::from(id), flag)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<CmdResult> {
        self.store.set_theme(theme)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Theme set to {}",
            theme.as_str()
        ))))
    }

    pub fn stats(&self) -> Result<CmdResult> {
        commands::stats::run(&self.store)
    }

    pub fn export(&mut self) -> Result<CmdResult> {
        commands::export::run(&mut self.store, &self.export_prefix)
    }

    pub fn import_in_flight(&self) -> bool {
        self.import_in_flight
    }

    /// Parse and validate an import. Nothing changes until the plan is applied.
    pub fn stage_import(&mut self, text: &str) -> Result<ImportPlan> {
        if self.import_in_flight {
            return Err(TrackerError::ImportInFlight);
        }
        let plan = commands::import::stage(&self.store, text)?;
        self.import_in_flight = true;
        Ok(plan)
    }

    /// Read an import file and stage it. Files declaring a non-JSON type are
    /// rejected before they are read.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportPlan> {
        if self.import_in_flight {
            return Err(TrackerError::ImportInFlight);
        }
        commands::import::check_file_type(path)?;
        let text = fs::read_to_string(path)?;
        self.stage_import(&text)
    }

    pub fn apply_import(
        &mut self,
        plan: ImportPlan,
        consent: OverwriteConsent,
    ) -> Result<CmdResult> {
        self.import_in_flight = false;
        let result = commands::import::apply(&mut self.store, plan, consent)?;
        info!("tracker data replaced by import");
        Ok(result)
    }

    pub fn cancel_import(&mut self, plan: ImportPlan) -> CmdResult {
        self.import_in_flight = false;
        drop(plan);
        CmdResult::default().with_message(CmdMessage::info("Import cancelled, nothing changed"))
    }

    /// Stage and apply in one call, for callers that already hold consent.
    pub fn import_document(
        &mut self,
        text: &str,
        consent: OverwriteConsent,
    ) -> Result<CmdResult> {
        let plan = self.stage_import(text)?;
        self.apply_import(plan, consent)
    }

    pub fn clear_all(&mut self, consent: ClearConsent) -> Result<CmdResult> {
        let result = commands::clear::run(&mut self.store, consent)?;
        info!("tracker data cleared");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Note, Quest};
    use crate::store::mem_backend::MemBackend;

    fn api() -> TrackerApi<MemBackend> {
        TrackerApi::new(
            DocumentStore::open(MemBackend::new()).unwrap(),
            "questlog-tracker",
        )
    }

    #[test]
    fn test_save_edit_toggle_delete() {
        let mut api = api();
        let saved = api.save(Quest::new("Find the Painter")).unwrap();
        let id = saved.affected[0].id().to_string();

        api.edit(&id, |q: &mut Quest| q.giver = "Gustave".into())
            .unwrap();
        assert_eq!(api.get::<Quest>(&id).unwrap().giver, "Gustave");

        api.toggle(Collection::Quests, &id, Flag::Completed).unwrap();
        assert!(api.get::<Quest>(&id).unwrap().is_completed);

        let result = api.delete(Collection::Quests, &[id.as_str()]).unwrap();
        assert_eq!(result.affected.len(), 1);
        assert!(api.records::<Quest>().is_empty());
    }

    #[test]
    fn test_second_import_is_refused_while_one_is_staged() {
        let mut api = api();
        let plan = api.stage_import(r#"{"notes":[]}"#).unwrap();
        assert!(api.import_in_flight());

        assert!(matches!(
            api.stage_import(r#"{"notes":[]}"#),
            Err(TrackerError::ImportInFlight)
        ));

        api.cancel_import(plan);
        assert!(!api.import_in_flight());
        assert!(api.stage_import(r#"{"notes":[]}"#).is_ok());
    }

    #[test]
    fn test_failed_stage_does_not_set_flag() {
        let mut api = api();
        assert!(api.stage_import("{").is_err());
        assert!(!api.import_in_flight());
    }

    #[test]
    fn test_failed_apply_clears_flag() {
        let mut api = api();
        api.save(Note::new("Keep")).unwrap();
        let plan = api.stage_import(r#"{"notes":[]}"#).unwrap();
        api.store().backend().set_simulate_write_error(true);

        assert!(api.apply_import(plan, OverwriteConsent::granted()).is_err());
        assert!(!api.import_in_flight());
        assert_eq!(api.records::<Note>().len(), 1);
    }

    #[test]
    fn test_cancel_changes_nothing() {
        let mut api = api();
        api.save(Note::new("Keep")).unwrap();
        let before = api.document().clone();

        let plan = api.stage_import(r#"{"quests":[{"name":"New"}]}"#).unwrap();
        api.cancel_import(plan);
        assert_eq!(api.document(), &before);
    }

    #[test]
    fn test_import_document_one_shot() {
        let mut api = api();
        api.save(Note::new("Old")).unwrap();
        api.import_document(
            r#"{"quests":[{"id":"q1","name":"Imported"}]}"#,
            OverwriteConsent::granted(),
        )
        .unwrap();
        assert!(api.records::<Note>().is_empty());
        assert_eq!(api.records::<Quest>()[0].id, RecordId::from("q1"));
        assert!(!api.import_in_flight());
    }

    #[test]
    fn test_export_uses_configured_prefix() {
        let mut api = TrackerApi::new(
            DocumentStore::open(MemBackend::new()).unwrap(),
            "coe33-tracker",
        );
        let artifact = api.export().unwrap().export.unwrap();
        assert!(artifact.filename.starts_with("coe33-tracker-backup-"));
    }

    #[test]
    fn test_set_theme() {
        let mut api = api();
        api.set_theme(Theme::DarkFuture).unwrap();
        assert_eq!(api.document().settings.theme, Theme::DarkFuture);
    }

    #[test]
    fn test_clear_all() {
        let mut api = api();
        api.save(Quest::new("Gone")).unwrap();
        api.clear_all(ClearConsent::from_confirmations(true, true).unwrap())
            .unwrap();
        assert!(api.document().is_empty());
    }
}
