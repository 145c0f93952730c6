use std::path::{Path, PathBuf};

use cmdsearch_core::command_index::CommandIndex;
use cmdsearch_core::model::ScanItem;
use cmdsearch_core::pins::{FilePinStorage, PinError, PinStorage, PinStore};
use cmdsearch_core::search::filter;

fn index() -> CommandIndex {
    CommandIndex::from_scan(vec![
        ScanItem::action("deleteItem", &["Edit", "Delete"]),
        ScanItem::action("duplicateItem", &["Edit", "Duplicate"]),
        ScanItem::action("polygonItem", &["Create", "Polygon"]),
    ])
}

fn store_at(dir: &tempfile::TempDir) -> PinStore {
    PinStore::new(Box::new(FilePinStorage::at(dir.path().join("pins.json"))))
}

#[test]
fn save_then_fresh_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = index();
    index.set_pinned("deleteItem", true);
    index.set_pinned("polygonItem", true);

    let mut store = store_at(&dir);
    assert_eq!(store.save_current_as_set("Modeling", &index).unwrap(), 2);
    assert_eq!(store.active(), Some("modeling"));

    let mut fresh = store_at(&dir);
    let sets = fresh.load();
    assert_eq!(
        sets.get("modeling").unwrap(),
        &vec!["Create > Polygon".to_string(), "Edit > Delete".to_string()]
    );
}

#[test]
fn stored_file_is_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = index();
    index.set_pinned("deleteItem", true);

    let mut store = store_at(&dir);
    store.save_current_as_set("a", &index).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("pins.json")).unwrap();
    assert_eq!(raw, "{\n    \"a\": [\n        \"Edit > Delete\"\n    ]\n}\n");
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["a"][0], "Edit > Delete");
}

#[test]
fn activate_set_pins_exactly_listed_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("pins.json"),
        r#"{"modeling": ["Edit > Delete", "Create > Polygon"], "anim": ["Edit > Duplicate"]}"#,
    )
    .unwrap();

    let mut index = index();
    let mut store = store_at(&dir);

    assert_eq!(store.activate_set("Modeling", &mut index), 2);
    let pinned: Vec<_> = filter(&index, "").iter().map(|e| e.id.clone()).collect();
    assert_eq!(pinned, vec!["polygonItem", "deleteItem"]);
    assert_eq!(store.active(), Some("modeling"));

    store.activate_set("anim", &mut index);
    let pinned: Vec<_> = filter(&index, "").iter().map(|e| e.id.clone()).collect();
    assert_eq!(pinned, vec!["duplicateItem"]);

    store.activate_set("unknown", &mut index);
    assert!(filter(&index, "").is_empty());
    assert_eq!(store.active(), None);
}

#[test]
fn save_rejects_empty_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = index();
    index.set_pinned("deleteItem", true);
    let mut store = store_at(&dir);

    assert!(matches!(
        store.save_current_as_set("", &index),
        Err(PinError::InvalidName(_))
    ));
    assert!(matches!(
        store.save_current_as_set("   ", &index),
        Err(PinError::InvalidName(_))
    ));
}

#[test]
fn save_rejects_nothing_pinned() {
    let dir = tempfile::tempdir().unwrap();
    let index = index();
    let mut store = store_at(&dir);

    assert!(matches!(
        store.save_current_as_set("foo", &index),
        Err(PinError::NoPinnedEntries)
    ));
    assert!(!dir.path().join("pins.json").exists());
}

#[test]
fn save_without_location_is_unavailable() {
    let mut index = index();
    index.set_pinned("deleteItem", true);
    let mut store = PinStore::new(Box::new(FilePinStorage::unavailable()));

    assert!(matches!(
        store.save_current_as_set("foo", &index),
        Err(PinError::PersistenceUnavailable)
    ));
    assert!(store.sets().is_empty());
    assert_eq!(store.active(), None);
}

#[test]
fn delete_missing_set_is_invalid_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = index();
    let mut store = store_at(&dir);

    assert!(matches!(
        store.delete_set("missing", &mut index),
        Err(PinError::InvalidName(_))
    ));
}

#[test]
fn delete_removes_set_and_clears_pins() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = index();
    index.set_pinned("deleteItem", true);
    let mut store = store_at(&dir);
    store.save_current_as_set("foo", &index).unwrap();
    store.save_current_as_set("bar", &index).unwrap();

    store.delete_set("FOO", &mut index).unwrap();

    assert!(index.pinned_paths().is_empty());
    assert_eq!(store.active(), None);
    let reloaded = store_at(&dir).load().clone();
    assert!(!reloaded.contains_key("foo"));
    assert!(reloaded.contains_key("bar"));
}

#[test]
fn clear_active_unpins_without_touching_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = index();
    index.set_pinned("deleteItem", true);
    let mut store = store_at(&dir);
    store.save_current_as_set("foo", &index).unwrap();
    let before = std::fs::read(dir.path().join("pins.json")).unwrap();

    store.clear_active(&mut index);

    assert!(index.pinned_paths().is_empty());
    assert_eq!(store.active(), None);
    assert_eq!(std::fs::read(dir.path().join("pins.json")).unwrap(), before);
}

#[test]
fn missing_or_corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_at(&dir);
    assert!(store.load().is_empty());

    std::fs::write(dir.path().join("pins.json"), "{ not json").unwrap();
    assert!(store.load().is_empty());

    std::fs::write(dir.path().join("pins.json"), "").unwrap();
    assert!(store.load().is_empty());

    let mut nowhere = PinStore::new(Box::new(FilePinStorage::unavailable()));
    assert!(nowhere.load().is_empty());
}

#[test]
fn load_picks_up_out_of_band_edits() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_at(&dir);
    assert!(store.sets().is_empty());

    std::fs::write(dir.path().join("pins.json"), r#"{"rig": ["Skeleton > Create Joints"]}"#).unwrap();
    assert!(store.sets().is_empty());
    assert!(store.load().contains_key("rig"));
}

#[test]
fn save_overwrites_existing_set() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = index();
    let mut store = store_at(&dir);

    index.set_pinned("deleteItem", true);
    store.save_current_as_set("foo", &index).unwrap();
    index.clear_pins();
    index.set_pinned("duplicateItem", true);
    store.save_current_as_set("foo", &index).unwrap();

    let sets = store_at(&dir).load().clone();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets["foo"], vec!["Edit > Duplicate".to_string()]);
}

/// Storage that reads from a fixed payload and refuses every write.
struct ReadOnlyStorage {
    stored: Option<Vec<u8>>,
}

impl PinStorage for ReadOnlyStorage {
    fn resolve_location(&self) -> Option<PathBuf> {
        Some(PathBuf::from("/locked/pins.json"))
    }

    fn read_all(&self, _path: &Path) -> std::io::Result<Option<Vec<u8>>> {
        Ok(self.stored.clone())
    }

    fn write_all(&self, _path: &Path, _bytes: &[u8]) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        ))
    }
}

#[test]
fn hand_edited_mixed_case_names_can_be_activated_and_deleted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("pins.json"),
        r#"{"Modeling": ["Edit > Delete"], "Anim": ["Edit > Duplicate"], "ANIM ": ["Create > Polygon"]}"#,
    )
    .unwrap();

    let mut index = index();
    let mut store = store_at(&dir);
    let names: Vec<String> = store.sets().keys().cloned().collect();
    assert_eq!(names, vec!["anim".to_string(), "modeling".to_string()]);

    assert_eq!(store.activate_set(&names[1], &mut index), 1);
    assert_eq!(filter(&index, "").len(), 1);
    assert_eq!(store.active(), Some("modeling"));

    assert_eq!(store.sets()["anim"], vec!["Create > Polygon".to_string()]);

    store.delete_set(&names[1], &mut index).unwrap();
    assert!(!store_at(&dir).load().contains_key("modeling"));
}

#[test]
fn failed_save_leaves_memory_untouched() {
    let mut index = index();
    index.set_pinned("deleteItem", true);
    let mut store = PinStore::new(Box::new(ReadOnlyStorage {
        stored: Some(br#"{"anim": ["Edit > Duplicate"]}"#.to_vec()),
    }));
    store.activate_set("anim", &mut index);
    index.set_pinned("polygonItem", true);

    assert!(matches!(
        store.save_current_as_set("foo", &index),
        Err(PinError::Io { .. })
    ));
    assert!(!store.sets().contains_key("foo"));
    assert_eq!(store.active(), Some("anim"));
}

#[test]
fn failed_delete_keeps_set_and_pins() {
    let mut index = index();
    let mut store = PinStore::new(Box::new(ReadOnlyStorage {
        stored: Some(br#"{"anim": ["Edit > Duplicate"]}"#.to_vec()),
    }));
    assert_eq!(store.activate_set("anim", &mut index), 1);

    assert!(matches!(
        store.delete_set("anim", &mut index),
        Err(PinError::Io { .. })
    ));
    assert!(store.sets().contains_key("anim"));
    assert_eq!(store.active(), Some("anim"));
    assert_eq!(index.pinned_paths(), vec!["Edit > Duplicate".to_string()]);
}
