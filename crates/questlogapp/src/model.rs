//! # Data Model
//!
//! The tracker keeps everything in one [`Document`]: five independent record
//! collections plus a small [`Settings`] object. Collections never reference each
//! other; a quest's `location` is free text, not a link to a [`Location`].
//!
//! ## Wire Shape
//!
//! The serde attributes here define the exact JSON written to the durable slot and
//! to export files:
//!
//! ```text
//! {
//!   "quests":     [{ "id", "name", "description", "location", "giver", "isMain", "isCompleted" }],
//!   "characters": [{ "id", "name", "notes", "isInParty" }],
//!   "inventory":  [{ "id", "name", "quantity", "type", "description", "isKeyItem" }],
//!   "locations":  [{ "id", "name", "region", "notes", "isDiscovered" }],
//!   "notes":      [{ "id", "title", "content" }],
//!   "settings":   { "theme": "light" | "dark-future", "lastExport": <RFC 3339> | null }
//! }
//! ```
//!
//! Deserializing through serde is only used for trusted round-trips. Anything read
//! back from the slot or from an import file goes through [`crate::reconcile`],
//! which rebuilds records field by field.
//!
//! ## Identity
//!
//! Every record carries a [`RecordId`]. An empty id means "not saved yet"; the
//! store assigns a fresh one on first save. Ids are opaque strings: generated ids
//! are UUIDs, but imported documents may carry anything (`"q1"`).

use crate::error::{Result, TrackerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id of a record that has never been saved.
    pub fn unassigned() -> Self {
        Self::default()
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    DarkFuture,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::DarkFuture => "dark-future",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark-future" => Ok(Theme::DarkFuture),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub last_export: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub giver: String,
    pub is_main: bool,
    pub is_completed: bool,
}

impl Quest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: RecordId,
    pub name: String,
    pub notes: String,
    pub is_in_party: bool,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: RecordId,
    pub name: String,
    /// Never negative once saved; see [`InventoryItem::parse_quantity`].
    pub quantity: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub is_key_item: bool,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parses user-entered quantity text.
    ///
    /// Reads the leading integer the way form input is usually interpreted
    /// (`"3 potions"` is 3). Anything without a leading integer, or a negative
    /// value, yields 0.
    pub fn parse_quantity(input: &str) -> i64 {
        let s = input.trim_start();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        match digits[..end].parse::<i64>() {
            Ok(n) if !negative => n,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: RecordId,
    pub name: String,
    pub region: String,
    pub notes: String,
    pub is_discovered: bool,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// The root aggregate: everything the tracker knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub quests: Vec<Quest>,
    pub characters: Vec<Character>,
    pub inventory: Vec<InventoryItem>,
    pub locations: Vec<Location>,
    pub notes: Vec<Note>,
    pub settings: Settings,
}

impl Document {
    pub fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Quests => self.quests.len(),
            Collection::Characters => self.characters.len(),
            Collection::Inventory => self.inventory.len(),
            Collection::Locations => self.locations.len(),
            Collection::Notes => self.notes.len(),
        }
    }

    /// True when no collection holds a record. Settings are not considered.
    pub fn is_empty(&self) -> bool {
        Collection::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Removes the record with `id` from `collection`. Returns whether one was removed.
    pub fn remove(&mut self, collection: Collection, id: &RecordId) -> bool {
        match collection {
            Collection::Quests => remove_from::<Quest>(self, id),
            Collection::Characters => remove_from::<Character>(self, id),
            Collection::Inventory => remove_from::<InventoryItem>(self, id),
            Collection::Locations => remove_from::<Location>(self, id),
            Collection::Notes => remove_from::<Note>(self, id),
        }
    }

    /// Flips `flag` on the record with `id`. Returns the new value, or `None` when
    /// no record has that id.
    pub fn toggle(
        &mut self,
        collection: Collection,
        id: &RecordId,
        flag: Flag,
    ) -> Result<Option<bool>> {
        match collection {
            Collection::Quests => toggle_in::<Quest>(self, id, flag),
            Collection::Characters => toggle_in::<Character>(self, id, flag),
            Collection::Inventory => toggle_in::<InventoryItem>(self, id, flag),
            Collection::Locations => toggle_in::<Location>(self, id, flag),
            Collection::Notes => toggle_in::<Note>(self, id, flag),
        }
    }
}

fn remove_from<R: Record>(doc: &mut Document, id: &RecordId) -> bool {
    let items = R::items_mut(doc);
    let before = items.len();
    items.retain(|r| r.id() != id);
    items.len() != before
}

fn toggle_in<R: Record>(doc: &mut Document, id: &RecordId, flag: Flag) -> Result<Option<bool>> {
    if !R::FLAGS.contains(&flag) {
        return Err(TrackerError::UnsupportedFlag {
            collection: R::COLLECTION.to_string(),
            flag: flag.to_string(),
        });
    }
    let Some(record) = R::items_mut(doc).iter_mut().find(|r| r.id() == id) else {
        return Ok(None);
    };
    Ok(record.flag_mut(flag).map(|value| {
        *value = !*value;
        *value
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Quests,
    Characters,
    Inventory,
    Locations,
    Notes,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Quests,
        Collection::Characters,
        Collection::Inventory,
        Collection::Locations,
        Collection::Notes,
    ];

    /// The JSON key of the collection.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Quests => "quests",
            Collection::Characters => "characters",
            Collection::Inventory => "inventory",
            Collection::Locations => "locations",
            Collection::Notes => "notes",
        }
    }

    /// Human name of a single record in the collection.
    pub fn label(&self) -> &'static str {
        match self {
            Collection::Quests => "Quest",
            Collection::Characters => "Character",
            Collection::Inventory => "Item",
            Collection::Locations => "Location",
            Collection::Notes => "Note",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Collection {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "quests" | "quest" => Ok(Collection::Quests),
            "characters" | "character" => Ok(Collection::Characters),
            "inventory" | "items" | "item" => Ok(Collection::Inventory),
            "locations" | "location" => Ok(Collection::Locations),
            "notes" | "note" => Ok(Collection::Notes),
            _ => Err(TrackerError::UnknownCollection(s.to_string())),
        }
    }
}

/// Boolean fields that can be flipped in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Main,
    Completed,
    InParty,
    KeyItem,
    Discovered,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flag::Main => "main",
            Flag::Completed => "completed",
            Flag::InParty => "in-party",
            Flag::KeyItem => "key-item",
            Flag::Discovered => "discovered",
        };
        f.write_str(name)
    }
}

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(Flag::Main),
            "completed" | "complete" | "done" => Ok(Flag::Completed),
            "in-party" | "party" => Ok(Flag::InParty),
            "key-item" | "key" => Ok(Flag::KeyItem),
            "discovered" => Ok(Flag::Discovered),
            other => Err(format!("unknown flag: {}", other)),
        }
    }
}

/// A record type living in one of the document's collections.
///
/// Every store operation is generic over this trait, so the five collections share
/// one implementation of upsert/remove/toggle.
pub trait Record: Clone + Into<AnyRecord> {
    const COLLECTION: Collection;
    /// Wire name of the field that must not be blank.
    const REQUIRED_FIELD: &'static str;
    /// Flags this record type carries.
    const FLAGS: &'static [Flag];

    fn id(&self) -> &RecordId;
    fn set_id(&mut self, id: RecordId);
    fn required_text(&self) -> &str;

    fn flag_mut(&mut self, _flag: Flag) -> Option<&mut bool> {
        None
    }

    /// Text fields matched by list searches, required field first.
    fn search_fields(&self) -> Vec<&str>;

    /// Auto-corrections applied before a save.
    fn normalize(&mut self) {}

    fn items(doc: &Document) -> &Vec<Self>;
    fn items_mut(doc: &mut Document) -> &mut Vec<Self>;

    fn validate(&self) -> Result<()> {
        if self.required_text().trim().is_empty() {
            return Err(TrackerError::Validation {
                kind: Self::COLLECTION.label(),
                field: Self::REQUIRED_FIELD,
            });
        }
        Ok(())
    }
}

impl Record for Quest {
    const COLLECTION: Collection = Collection::Quests;
    const REQUIRED_FIELD: &'static str = "name";
    const FLAGS: &'static [Flag] = &[Flag::Main, Flag::Completed];

    fn id(&self) -> &RecordId {
        &self.id
    }
    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
    fn required_text(&self) -> &str {
        &self.name
    }
    fn flag_mut(&mut self, flag: Flag) -> Option<&mut bool> {
        match flag {
            Flag::Main => Some(&mut self.is_main),
            Flag::Completed => Some(&mut self.is_completed),
            _ => None,
        }
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.location.as_str(),
            self.giver.as_str(),
        ]
    }
    fn items(doc: &Document) -> &Vec<Self> {
        &doc.quests
    }
    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.quests
    }
}

impl Record for Character {
    const COLLECTION: Collection = Collection::Characters;
    const REQUIRED_FIELD: &'static str = "name";
    const FLAGS: &'static [Flag] = &[Flag::InParty];

    fn id(&self) -> &RecordId {
        &self.id
    }
    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
    fn required_text(&self) -> &str {
        &self.name
    }
    fn flag_mut(&mut self, flag: Flag) -> Option<&mut bool> {
        match flag {
            Flag::InParty => Some(&mut self.is_in_party),
            _ => None,
        }
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.notes.as_str()]
    }
    fn items(doc: &Document) -> &Vec<Self> {
        &doc.characters
    }
    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.characters
    }
}

impl Record for InventoryItem {
    const COLLECTION: Collection = Collection::Inventory;
    const REQUIRED_FIELD: &'static str = "name";
    const FLAGS: &'static [Flag] = &[Flag::KeyItem];

    fn id(&self) -> &RecordId {
        &self.id
    }
    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
    fn required_text(&self) -> &str {
        &self.name
    }
    fn flag_mut(&mut self, flag: Flag) -> Option<&mut bool> {
        match flag {
            Flag::KeyItem => Some(&mut self.is_key_item),
            _ => None,
        }
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str(), self.kind.as_str()]
    }
    fn normalize(&mut self) {
        self.quantity = self.quantity.max(0);
    }
    fn items(doc: &Document) -> &Vec<Self> {
        &doc.inventory
    }
    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.inventory
    }
}

impl Record for Location {
    const COLLECTION: Collection = Collection::Locations;
    const REQUIRED_FIELD: &'static str = "name";
    const FLAGS: &'static [Flag] = &[Flag::Discovered];

    fn id(&self) -> &RecordId {
        &self.id
    }
    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
    fn required_text(&self) -> &str {
        &self.name
    }
    fn flag_mut(&mut self, flag: Flag) -> Option<&mut bool> {
        match flag {
            Flag::Discovered => Some(&mut self.is_discovered),
            _ => None,
        }
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.region.as_str(), self.notes.as_str()]
    }
    fn items(doc: &Document) -> &Vec<Self> {
        &doc.locations
    }
    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.locations
    }
}

impl Record for Note {
    const COLLECTION: Collection = Collection::Notes;
    const REQUIRED_FIELD: &'static str = "title";
    const FLAGS: &'static [Flag] = &[];

    fn id(&self) -> &RecordId {
        &self.id
    }
    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
    fn required_text(&self) -> &str {
        &self.title
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }
    fn items(doc: &Document) -> &Vec<Self> {
        &doc.notes
    }
    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.notes
    }
}

/// A record of any collection, for results that mix or hide the concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnyRecord {
    Quest(Quest),
    Character(Character),
    Item(InventoryItem),
    Location(Location),
    Note(Note),
}

impl AnyRecord {
    pub fn collection(&self) -> Collection {
        match self {
            AnyRecord::Quest(_) => Collection::Quests,
            AnyRecord::Character(_) => Collection::Characters,
            AnyRecord::Item(_) => Collection::Inventory,
            AnyRecord::Location(_) => Collection::Locations,
            AnyRecord::Note(_) => Collection::Notes,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            AnyRecord::Quest(r) => &r.id,
            AnyRecord::Character(r) => &r.id,
            AnyRecord::Item(r) => &r.id,
            AnyRecord::Location(r) => &r.id,
            AnyRecord::Note(r) => &r.id,
        }
    }

    /// The name (or a note's title).
    pub fn title(&self) -> &str {
        match self {
            AnyRecord::Quest(r) => &r.name,
            AnyRecord::Character(r) => &r.name,
            AnyRecord::Item(r) => &r.name,
            AnyRecord::Location(r) => &r.name,
            AnyRecord::Note(r) => &r.title,
        }
    }

    /// Look up a record by collection and id.
    pub fn find(doc: &Document, collection: Collection, id: &RecordId) -> Option<AnyRecord> {
        fn find_in<R: Record>(doc: &Document, id: &RecordId) -> Option<AnyRecord> {
            R::items(doc)
                .iter()
                .find(|r| r.id() == id)
                .cloned()
                .map(Into::into)
        }
        match collection {
            Collection::Quests => find_in::<Quest>(doc, id),
            Collection::Characters => find_in::<Character>(doc, id),
            Collection::Inventory => find_in::<InventoryItem>(doc, id),
            Collection::Locations => find_in::<Location>(doc, id),
            Collection::Notes => find_in::<Note>(doc, id),
        }
    }
}

impl From<Quest> for AnyRecord {
    fn from(value: Quest) -> Self {
        AnyRecord::Quest(value)
    }
}

impl From<Character> for AnyRecord {
    fn from(value: Character) -> Self {
        AnyRecord::Character(value)
    }
}

impl From<InventoryItem> for AnyRecord {
    fn from(value: InventoryItem) -> Self {
        AnyRecord::Item(value)
    }
}

impl From<Location> for AnyRecord {
    fn from(value: Location) -> Self {
        AnyRecord::Location(value)
    }
}

impl From<Note> for AnyRecord {
    fn from(value: Note) -> Self {
        AnyRecord::Note(value)
    }
}
