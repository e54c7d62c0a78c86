use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::{DocumentStore, SlotBackend};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Dashboard numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub active_quests: usize,
    pub total_quests: usize,
    pub characters: usize,
    pub inventory_items: usize,
    pub locations: usize,
    pub discovered_locations: usize,
    pub notes: usize,
    /// `None` when the tracker was never exported.
    pub last_export: Option<DateTime<Utc>>,
}

pub fn run<B: SlotBackend>(store: &DocumentStore<B>) -> Result<CmdResult> {
    let doc = store.document();
    let stats = Stats {
        active_quests: doc.quests.iter().filter(|q| !q.is_completed).count(),
        total_quests: doc.quests.len(),
        characters: doc.characters.len(),
        inventory_items: doc.inventory.len(),
        locations: doc.locations.len(),
        discovered_locations: doc.locations.iter().filter(|l| l.is_discovered).count(),
        notes: doc.notes.len(),
        last_export: doc.settings.last_export,
    };
    Ok(CmdResult {
        stats: Some(stats),
        ..Default::default()
    })
}
