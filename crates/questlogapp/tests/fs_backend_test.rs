use questlogapp::error::TrackerError;
use questlogapp::ids::IdGenerator;
use questlogapp::model::{Document, InventoryItem, Quest};
use questlogapp::store::backend::SlotBackend;
use questlogapp::store::fs_backend::FsBackend;
use questlogapp::store::persistence::Persistence;
use questlogapp::store::DocumentStore;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf(), "questlog-tracker-data");
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_slot_io() {
    let (_dir, backend) = setup();

    assert_eq!(backend.read().unwrap(), None);

    backend.write("{\"quests\": []}").unwrap();
    assert_eq!(backend.read().unwrap().as_deref(), Some("{\"quests\": []}"));

    backend.erase().unwrap();
    assert_eq!(backend.read().unwrap(), None);

    // Erasing an absent slot is fine
    backend.erase().unwrap();
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();
    backend.write("first").unwrap();
    backend.write("second").unwrap();

    let expected_path = dir.path().join("questlog-tracker-data.json");
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), "second");

    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let backend = FsBackend::new(nested.clone(), "slot");

    backend.write("{}").unwrap();
    assert!(nested.join("slot.json").exists());
}

#[test]
fn test_fs_backend_write_failure_is_persistence_error() {
    let dir = TempDir::new().unwrap();
    // A file where the data directory should be
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let backend = FsBackend::new(blocker, "slot");

    assert!(matches!(
        backend.write("{}"),
        Err(TrackerError::Persistence { .. })
    ));
}

#[test]
fn test_document_survives_reopen() {
    let (_dir, backend) = setup();
    let mut store = DocumentStore::open(backend.clone()).unwrap();
    let quest = store.upsert(Quest::new("Find the Painter")).unwrap();
    let mut potion = InventoryItem::new("Potion");
    potion.quantity = 3;
    store.upsert(potion).unwrap();

    let reopened = DocumentStore::open(backend).unwrap();
    assert_eq!(reopened.document(), store.document());
    assert_eq!(reopened.get::<Quest>(&quest.id).unwrap().name, "Find the Painter");
}

#[test]
fn test_slot_on_disk_is_pretty_json_with_wire_names() {
    let (dir, backend) = setup();
    let mut store = DocumentStore::open(backend).unwrap();
    let mut quest = Quest::new("Main line");
    quest.is_main = true;
    store.upsert(quest).unwrap();

    let raw = fs::read_to_string(dir.path().join("questlog-tracker-data.json")).unwrap();
    assert!(raw.contains("\n  \"quests\": ["));
    assert!(raw.contains("\"isMain\": true"));
    assert!(raw.contains("\"lastExport\": null"));
    assert!(raw.contains("\"theme\": \"light\""));
}

#[test]
fn test_hand_written_old_slot_loads_with_defaults() {
    let (dir, backend) = setup();
    fs::write(
        dir.path().join("questlog-tracker-data.json"),
        r#"{"inventory":[{"id":"i1","name":"Potion","quantity":"12 flasks"}]}"#,
    )
    .unwrap();

    let doc = Persistence::new(&backend).load(&IdGenerator::new()).unwrap();
    assert_eq!(doc.inventory[0].quantity, 12);
    assert!(doc.quests.is_empty());
    assert_eq!(doc.settings, Document::default().settings);
}

#[test]
fn test_zero_byte_slot_loads_as_empty_tracker() {
    let (dir, backend) = setup();
    fs::write(dir.path().join("questlog-tracker-data.json"), "").unwrap();

    let store = DocumentStore::open(backend).unwrap();
    assert_eq!(store.document(), &Document::default());
}

#[test]
fn test_slot_with_invalid_utf8_is_corrupt() {
    let (dir, backend) = setup();
    let slot = dir.path().join("questlog-tracker-data.json");
    fs::write(&slot, [0xff, 0xfe, b'{', b'}']).unwrap();

    assert!(matches!(
        backend.read(),
        Err(TrackerError::CorruptData { .. })
    ));
    assert!(matches!(
        DocumentStore::open(backend),
        Err(TrackerError::CorruptData { .. })
    ));
    // Left in place for the user to inspect
    assert_eq!(fs::read(&slot).unwrap(), vec![0xff, 0xfe, b'{', b'}']);
}
