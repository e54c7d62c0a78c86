use crate::model::{AnyRecord, Collection, RecordId};
use crate::store::{DocumentStore, SlotBackend};

/// "Quest: Find the Painter", used in command messages.
pub fn describe(record: &AnyRecord) -> String {
    format!("{}: {}", record.collection().label(), record.title())
}

pub fn lookup<B: SlotBackend>(
    store: &DocumentStore<B>,
    collection: Collection,
    id: &RecordId,
) -> Option<AnyRecord> {
    AnyRecord::find(store.document(), collection, id)
}

pub fn not_found_message(collection: Collection, id: &RecordId) -> String {
    format!("No {} with id {}", collection.label().to_lowercase(), id)
}

/// Case-insensitive substring match over any of `fields`. A blank term matches
/// everything.
pub fn matches_search(fields: &[&str], term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}
