//! # Reconciliation
//!
//! Turns an untrusted JSON value (the durable slot, or an import file) into a
//! well-formed [`Document`].
//!
//! Older slots and hand-edited backups may miss keys, carry keys this version does
//! not know, or hold values of the wrong type. Instead of merging the raw object
//! over the defaults, every field of every record is read on its own:
//!
//! | Field kind | Accepted | Anything else |
//! |------------|----------|---------------|
//! | text | JSON string | `""` |
//! | flag | JSON bool | `false` |
//! | `quantity` | integer (negative clamps to 0, fractions truncate) or numeric string | `0` |
//! | `settings.theme` | `"light"`, `"dark-future"` | `light` |
//! | `settings.lastExport` | RFC 3339 string | `null` |
//!
//! Whole records are dropped when they are not objects or when their required text
//! is blank, so nothing that would fail validation on save can enter the store
//! through a load or an import. Records without an id get a fresh one; a repeated
//! id keeps its first occurrence. A collection key holding something other than an
//! array falls back to an empty collection.
//!
//! Everything that was changed is counted in a [`ReconcileReport`].

use crate::ids::IdGenerator;
use crate::model::{
    Character, Collection, Document, InventoryItem, Location, Note, Quest, Record, RecordId,
    Settings, Theme,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// What reconciliation had to change to produce a valid document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records dropped because they were not objects or had blank required text.
    pub dropped_records: usize,
    /// Records dropped because an earlier record in the same collection had the same id.
    pub duplicate_ids: usize,
    /// Records that had no id and were given one.
    pub assigned_ids: usize,
    /// Collections or settings whose value was unusable and fell back to defaults.
    pub defaulted_fields: Vec<String>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_records == 0
            && self.duplicate_ids == 0
            && self.assigned_ids == 0
            && self.defaulted_fields.is_empty()
    }
}

/// Top-level keys that identify a tracker document.
pub fn recognized_keys() -> impl Iterator<Item = &'static str> {
    Collection::ALL
        .iter()
        .map(|c| c.key())
        .chain(std::iter::once("settings"))
}

/// The loose shape check used by import: an object carrying at least one known key.
pub fn looks_like_document(value: &Value) -> bool {
    match value.as_object() {
        Some(obj) => recognized_keys().any(|key| obj.contains_key(key)),
        None => false,
    }
}

/// Builds a document from `root`, filling every missing or unusable field with its default.
pub fn reconcile(root: &Map<String, Value>, ids: &IdGenerator) -> (Document, ReconcileReport) {
    let mut report = ReconcileReport::default();
    let doc = Document {
        quests: collection(root, &mut report, ids, quest),
        characters: collection(root, &mut report, ids, character),
        inventory: collection(root, &mut report, ids, inventory_item),
        locations: collection(root, &mut report, ids, location),
        notes: collection(root, &mut report, ids, note),
        settings: settings(root.get("settings"), &mut report),
    };
    (doc, report)
}

fn collection<R: Record>(
    root: &Map<String, Value>,
    report: &mut ReconcileReport,
    ids: &IdGenerator,
    build: fn(&Map<String, Value>) -> R,
) -> Vec<R> {
    let key = R::COLLECTION.key();
    let entries = match root.get(key) {
        None => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            report.defaulted_fields.push(key.to_string());
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(obj) = entry.as_object() else {
            report.dropped_records += 1;
            continue;
        };
        let mut record = build(obj);
        if record.validate().is_err() {
            report.dropped_records += 1;
            continue;
        }
        if record.id().is_unassigned() {
            record.set_id(ids.generate());
            report.assigned_ids += 1;
        }
        if !seen.insert(record.id().clone()) {
            report.duplicate_ids += 1;
            continue;
        }
        record.normalize();
        records.push(record);
    }
    records
}

fn settings(value: Option<&Value>, report: &mut ReconcileReport) -> Settings {
    let mut settings = Settings::default();
    let obj = match value {
        None | Some(Value::Null) => return settings,
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            report.defaulted_fields.push("settings".to_string());
            return settings;
        }
    };

    match obj.get("theme") {
        None => {}
        Some(theme) => match theme.as_str().and_then(|s| s.parse::<Theme>().ok()) {
            Some(theme) => settings.theme = theme,
            None => report.defaulted_fields.push("settings.theme".to_string()),
        },
    }

    match obj.get("lastExport") {
        None | Some(Value::Null) => {}
        Some(stamp) => match stamp
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        {
            Some(stamp) => settings.last_export = Some(stamp.with_timezone(&Utc)),
            None => report
                .defaulted_fields
                .push("settings.lastExport".to_string()),
        },
    }

    settings
}

fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn flag(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn id(obj: &Map<String, Value>) -> RecordId {
    match obj.get("id") {
        Some(Value::String(s)) => RecordId::new(s.clone()),
        // Numeric ids show up in hand-written backups.
        Some(Value::Number(n)) => RecordId::new(n.to_string()),
        _ => RecordId::unassigned(),
    }
}

fn quantity(obj: &Map<String, Value>) -> i64 {
    let raw = match obj.get("quantity") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => InventoryItem::parse_quantity(s),
        _ => 0,
    };
    raw.max(0)
}

fn quest(obj: &Map<String, Value>) -> Quest {
    Quest {
        id: id(obj),
        name: text(obj, "name"),
        description: text(obj, "description"),
        location: text(obj, "location"),
        giver: text(obj, "giver"),
        is_main: flag(obj, "isMain"),
        is_completed: flag(obj, "isCompleted"),
    }
}

fn character(obj: &Map<String, Value>) -> Character {
    Character {
        id: id(obj),
        name: text(obj, "name"),
        notes: text(obj, "notes"),
        is_in_party: flag(obj, "isInParty"),
    }
}

fn inventory_item(obj: &Map<String, Value>) -> InventoryItem {
    InventoryItem {
        id: id(obj),
        name: text(obj, "name"),
        quantity: quantity(obj),
        kind: text(obj, "type"),
        description: text(obj, "description"),
        is_key_item: flag(obj, "isKeyItem"),
    }
}

fn location(obj: &Map<String, Value>) -> Location {
    Location {
        id: id(obj),
        name: text(obj, "name"),
        region: text(obj, "region"),
        notes: text(obj, "notes"),
        is_discovered: flag(obj, "isDiscovered"),
    }
}

fn note(obj: &Map<String, Value>) -> Note {
    Note {
        id: id(obj),
        title: text(obj, "title"),
        content: text(obj, "content"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: Value) -> (Document, ReconcileReport) {
        let ids = IdGenerator::new();
        reconcile(value.as_object().unwrap(), &ids)
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let (doc, report) = run(json!({}));
        assert_eq!(doc, Document::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_partial_settings_are_default_filled() {
        let (doc, report) = run(json!({ "settings": { "theme": "dark-future" } }));
        assert_eq!(doc.settings.theme, Theme::DarkFuture);
        assert_eq!(doc.settings.last_export, None);
        assert!(report.is_clean());
    }

    #[test]
    fn test_last_export_accepts_millisecond_timestamps() {
        let (doc, _) = run(json!({ "settings": { "lastExport": "2025-04-24T18:30:05.123Z" } }));
        let stamp = doc.settings.last_export.unwrap();
        assert_eq!(stamp.to_rfc3339(), "2025-04-24T18:30:05.123+00:00");
    }

    #[test]
    fn test_bad_settings_values_fall_back() {
        let (doc, report) = run(json!({
            "settings": { "theme": "sepia", "lastExport": "yesterday" }
        }));
        assert_eq!(doc.settings, Settings::default());
        assert_eq!(
            report.defaulted_fields,
            vec!["settings.theme", "settings.lastExport"]
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let (doc, report) = run(json!({
            "quests": [{ "id": "q1", "name": "Find the Painter", "isMain": true, "isCompleted": false }]
        }));
        assert_eq!(
            doc.quests,
            vec![Quest {
                id: RecordId::from("q1"),
                name: "Find the Painter".into(),
                is_main: true,
                ..Default::default()
            }]
        );
        assert!(doc.characters.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_wrong_types_are_not_trusted() {
        let (doc, _) = run(json!({
            "characters": [{ "id": "c1", "name": "Maelle", "notes": 42, "isInParty": "yes" }]
        }));
        assert_eq!(doc.characters[0].notes, "");
        assert!(!doc.characters[0].is_in_party);
    }

    #[test]
    fn test_invalid_records_are_dropped() {
        let (doc, report) = run(json!({
            "notes": [
                { "id": "n1", "title": "   " },
                "not a record",
                { "id": "n2", "title": "Lore", "content": "Paintress" }
            ]
        }));
        assert_eq!(doc.notes.len(), 1);
        assert_eq!(doc.notes[0].title, "Lore");
        assert_eq!(report.dropped_records, 2);
    }

    #[test]
    fn test_missing_ids_are_assigned_and_duplicates_dropped() {
        let (doc, report) = run(json!({
            "locations": [
                { "name": "Lumiere" },
                { "id": "l1", "name": "Flying Waters" },
                { "id": "l1", "name": "Ancient Sanctuary" }
            ]
        }));
        assert_eq!(doc.locations.len(), 2);
        assert!(!doc.locations[0].id.is_unassigned());
        assert_eq!(doc.locations[1].name, "Flying Waters");
        assert_eq!(report.assigned_ids, 1);
        assert_eq!(report.duplicate_ids, 1);
    }

    #[test]
    fn test_quantity_coercion() {
        let (doc, _) = run(json!({
            "inventory": [
                { "id": "a", "name": "Potion", "quantity": -5 },
                { "id": "b", "name": "Elixir", "quantity": 2.9 },
                { "id": "c", "name": "Chroma", "quantity": "12" },
                { "id": "d", "name": "Key", "quantity": null },
                { "id": "e", "name": "Coin", "quantity": 7 }
            ]
        }));
        let quantities: Vec<i64> = doc.inventory.iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![0, 2, 12, 0, 7]);
    }

    #[test]
    fn test_non_array_collection_falls_back() {
        let (doc, report) = run(json!({ "quests": null, "notes": { "a": 1 } }));
        assert!(doc.quests.is_empty());
        assert!(doc.notes.is_empty());
        assert_eq!(report.defaulted_fields, vec!["quests", "notes"]);
    }

    #[test]
    fn test_serialized_document_reconciles_to_itself() {
        let mut doc = Document::default();
        let mut item = InventoryItem::new("Potion");
        item.id = RecordId::from("i1");
        item.quantity = 3;
        item.kind = "Consumable".into();
        doc.inventory.push(item);
        doc.settings.last_export = Some(Utc::now());

        let value = serde_json::to_value(&doc).unwrap();
        let (back, report) = run(value);
        assert_eq!(back, doc);
        assert!(report.is_clean());
    }

    #[test]
    fn test_looks_like_document() {
        assert!(looks_like_document(&json!({ "notes": [] })));
        assert!(looks_like_document(&json!({ "settings": {} })));
        assert!(!looks_like_document(&json!({ "foo": "bar" })));
        assert!(!looks_like_document(&json!([{ "quests": [] }])));
        assert!(!looks_like_document(&Value::Null));
    }
}
