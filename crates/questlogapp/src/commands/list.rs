//! # Listing
//!
//! The store keeps records in insertion order. This command produces the display
//! view of one collection: filtered by a search term (and, for quests, by status and
//! type) and sorted for reading.
//!
//! Sort orders, all case-insensitive:
//! - quests, characters: by name
//! - inventory: by type, then name
//! - locations: by region, then name
//! - notes: by title

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{
    AnyRecord, Character, Collection, InventoryItem, Location, Note, Quest, Record,
};
use crate::store::{DocumentStore, SlotBackend};
use std::cmp::Ordering;
use std::str::FromStr;

use super::helpers::matches_search;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestStatus {
    #[default]
    All,
    Active,
    Completed,
}

impl FromStr for QuestStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(QuestStatus::All),
            "active" => Ok(QuestStatus::Active),
            "completed" | "done" => Ok(QuestStatus::Completed),
            other => Err(format!("unknown quest status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestType {
    #[default]
    All,
    Main,
    Side,
}

impl FromStr for QuestType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(QuestType::All),
            "main" => Ok(QuestType::Main),
            "side" => Ok(QuestType::Side),
            other => Err(format!("unknown quest type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    /// Quests only.
    pub status: QuestStatus,
    /// Quests only.
    pub quest_type: QuestType,
}

impl ListFilter {
    fn has_quest_filters(&self) -> bool {
        self.status != QuestStatus::All || self.quest_type != QuestType::All
    }

    fn admits_quest(&self, quest: &Quest) -> bool {
        let status_ok = match self.status {
            QuestStatus::All => true,
            QuestStatus::Active => !quest.is_completed,
            QuestStatus::Completed => quest.is_completed,
        };
        let type_ok = match self.quest_type {
            QuestType::All => true,
            QuestType::Main => quest.is_main,
            QuestType::Side => !quest.is_main,
        };
        status_ok && type_ok
    }
}

/// Display ordering of a record type.
trait DisplayOrder {
    fn display_cmp(&self, other: &Self) -> Ordering;
}

fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl DisplayOrder for Quest {
    fn display_cmp(&self, other: &Self) -> Ordering {
        text_cmp(&self.name, &other.name)
    }
}

impl DisplayOrder for Character {
    fn display_cmp(&self, other: &Self) -> Ordering {
        text_cmp(&self.name, &other.name)
    }
}

impl DisplayOrder for InventoryItem {
    fn display_cmp(&self, other: &Self) -> Ordering {
        text_cmp(&self.kind, &other.kind).then_with(|| text_cmp(&self.name, &other.name))
    }
}

impl DisplayOrder for Location {
    fn display_cmp(&self, other: &Self) -> Ordering {
        text_cmp(&self.region, &other.region).then_with(|| text_cmp(&self.name, &other.name))
    }
}

impl DisplayOrder for Note {
    fn display_cmp(&self, other: &Self) -> Ordering {
        text_cmp(&self.title, &other.title)
    }
}

fn view<R, F>(records: &[R], search: &str, admit: F) -> Vec<AnyRecord>
where
    R: Record + DisplayOrder,
    F: Fn(&R) -> bool,
{
    let mut matched: Vec<&R> = records
        .iter()
        .filter(|r| admit(*r) && matches_search(&r.search_fields(), search))
        .collect();
    // Stable, so equal keys keep insertion order
    matched.sort_by(|a, b| a.display_cmp(b));
    matched.into_iter().cloned().map(Into::into).collect()
}

pub fn run<B: SlotBackend>(
    store: &DocumentStore<B>,
    collection: Collection,
    filter: &ListFilter,
) -> Result<CmdResult> {
    let search = filter.search.as_deref().unwrap_or("");

    let listed = match collection {
        Collection::Quests => view(store.list::<Quest>(), search, |q| filter.admits_quest(q)),
        Collection::Characters => view(store.list::<Character>(), search, |_| true),
        Collection::Inventory => view(store.list::<InventoryItem>(), search, |_| true),
        Collection::Locations => view(store.list::<Location>(), search, |_| true),
        Collection::Notes => view(store.list::<Note>(), search, |_| true),
    };

    let mut result = CmdResult::default().with_listed(listed);
    if collection != Collection::Quests && filter.has_quest_filters() {
        result.add_message(CmdMessage::warning(
            "Status and type filters only apply to quests",
        ));
    }
    if result.listed.is_empty() {
        let message = if store.document().len(collection) == 0 {
            format!("No {} yet", collection)
        } else {
            format!("No {} match the current filters", collection)
        };
        result.add_message(CmdMessage::info(message));
    }
    Ok(result)
}
