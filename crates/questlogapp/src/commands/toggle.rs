use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Collection, Flag, RecordId};
use crate::store::{DocumentStore, SlotBackend};

use super::helpers::{describe, lookup, not_found_message};

/// Flips one boolean flag on a record.
///
/// An unknown id changes nothing and is reported as a warning. A flag the
/// collection does not carry (`completed` on a note) is an error.
pub fn run<B: SlotBackend>(
    store: &mut DocumentStore<B>,
    collection: Collection,
    id: &RecordId,
    flag: Flag,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let Some(value) = store.toggle_in(collection, id, flag)? else {
        result.add_message(CmdMessage::warning(not_found_message(collection, id)));
        return Ok(result);
    };

    if let Some(record) = lookup(store, collection, id) {
        let state = if value { "now" } else { "no longer" };
        result.add_message(CmdMessage::success(format!(
            "{} is {} {}",
            describe(&record),
            state,
            flag
        )));
        result.affected.push(record);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::model::{Location, Note, Quest};
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn test_toggle_reports_new_state() {
        let mut store = DocumentStore::open(MemBackend::new()).unwrap();
        let loc = store.upsert(Location::new("Lumiere")).unwrap();

        let result = run(&mut store, Collection::Locations, &loc.id, Flag::Discovered).unwrap();
        assert_eq!(result.messages[0].content, "Location: Lumiere is now discovered");
        assert!(store.list::<Location>()[0].is_discovered);

        let result = run(&mut store, Collection::Locations, &loc.id, Flag::Discovered).unwrap();
        assert_eq!(
            result.messages[0].content,
            "Location: Lumiere is no longer discovered"
        );
    }

    #[test]
    fn test_unknown_id_is_a_warning() {
        let mut store = DocumentStore::open(MemBackend::new()).unwrap();
        store.upsert(Quest::new("Untouched")).unwrap();
        let before = store.document().clone();

        let result = run(
            &mut store,
            Collection::Quests,
            &RecordId::from("missing"),
            Flag::Completed,
        )
        .unwrap();

        assert!(result.affected.is_empty());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_flag_not_carried_by_collection() {
        let mut store = DocumentStore::open(MemBackend::new()).unwrap();
        let note = store.upsert(Note::new("Plain")).unwrap();
        assert!(matches!(
            run(&mut store, Collection::Notes, &note.id, Flag::Completed),
            Err(TrackerError::UnsupportedFlag { .. })
        ));
    }
}
