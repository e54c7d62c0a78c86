use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{AnyRecord, Collection, RecordId};
use crate::store::{DocumentStore, SlotBackend};

use super::helpers::{describe, lookup, not_found_message};

/// Removes records by id. Ids that match nothing produce a warning, not an error.
///
/// All found records go in one save: either every one of them is deleted or,
/// when the save fails, none is.
pub fn run<B: SlotBackend>(
    store: &mut DocumentStore<B>,
    collection: Collection,
    ids: &[RecordId],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut found: Vec<AnyRecord> = Vec::new();

    for id in ids {
        if found.iter().any(|r| r.id() == id) {
            continue;
        }
        match lookup(store, collection, id) {
            Some(record) => found.push(record),
            None => result.add_message(CmdMessage::warning(not_found_message(collection, id))),
        }
    }

    let found_ids: Vec<RecordId> = found.iter().map(|r| r.id().clone()).collect();
    store.remove_all_in(collection, &found_ids)?;

    for record in found {
        result.add_message(CmdMessage::success(format!("{} deleted", describe(&record))));
        result.affected.push(record);
    }
    Ok(result)
}
