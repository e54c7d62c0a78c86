use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TrackerError};
use crate::model::{AnyRecord, Record, RecordId};
use crate::store::{DocumentStore, SlotBackend};

use super::helpers::describe;

/// Saves a record, adding it when it is new and replacing it otherwise.
pub fn run<B: SlotBackend, R: Record>(
    store: &mut DocumentStore<B>,
    record: R,
) -> Result<CmdResult> {
    let is_new = record.id().is_unassigned() || store.get::<R>(record.id()).is_none();
    let saved: AnyRecord = store.upsert(record)?.into();

    let verb = if is_new { "added" } else { "updated" };
    let message = CmdMessage::success(format!("{} {}", describe(&saved), verb));
    Ok(CmdResult::default()
        .with_affected(vec![saved])
        .with_message(message))
}

/// Applies `change` to the stored record with `id` and saves it in place.
pub fn edit<B, R, F>(store: &mut DocumentStore<B>, id: &RecordId, change: F) -> Result<CmdResult>
where
    B: SlotBackend,
    R: Record,
    F: FnOnce(&mut R),
{
    let mut record = store
        .get::<R>(id)
        .cloned()
        .ok_or_else(|| TrackerError::NotFound {
            collection: R::COLLECTION.label(),
            id: id.to_string(),
        })?;
    change(&mut record);
    // The closure may not reassign identity
    record.set_id(id.clone());
    run(store, record)
}
