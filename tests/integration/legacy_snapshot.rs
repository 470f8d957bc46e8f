use deskfs::store::{KvStore, MemoryKvStore, DEFAULT_SNAPSHOT_KEY};
use deskfs::tree::codec::{decode_key, encode_key};
use deskfs::tree::{find_type, Snapshot, MAX_DEPTH};
use deskfs::views::flatten;
use deskfs::{ApiError, EntryType, FileKind, FsError, Kernel};
use serde_json::json;
use std::sync::Arc;

#[test]
fn every_kind_has_a_distinct_code() {
    let mut keys: Vec<String> = FileKind::ALL
        .iter()
        .map(|kind| encode_key(*kind, "same"))
        .collect();
    for (kind, key) in FileKind::ALL.iter().zip(&keys) {
        assert_eq!(decode_key(key), Some((*kind, "same")));
    }
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), FileKind::ALL.len());
}

#[test]
fn find_type_classifies_raw_entries() {
    assert_eq!(find_type("Music", &json!({"3-a": "u"})), Some(EntryType::Directory));
    assert_eq!(find_type("1-Cat.jpg", &json!("u")), Some(EntryType::File(FileKind::Image)));
    assert_eq!(find_type("4-clip", &json!("u")), Some(EntryType::File(FileKind::Video)));
    assert_eq!(find_type("x-odd", &json!("u")), None);
}

#[test]
fn display_names_keep_everything_after_the_prefix() {
    let bytes = serde_json::to_vec(&json!({
        "files": {"1-a-b-c.png": "u", "3_tune": "v"},
        "cursor": "/"
    }))
    .unwrap();
    let snapshot = Snapshot::from_json("fileSystemState", &bytes).unwrap();
    let names: Vec<_> = flatten(&snapshot.files).into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["a-b-c.png", "tune"]);
}

#[test]
fn unreadable_entries_are_kept_but_hidden() {
    let files = json!({
        "9-mystery": "u",
        "1-": "empty name",
        "count": 3,
        "2-kept": "doc"
    });
    let bytes = serde_json::to_vec(&json!({ "files": files.clone() })).unwrap();
    let snapshot = Snapshot::from_json("fileSystemState", &bytes).unwrap();
    let records = flatten(&snapshot.files);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "kept");
    assert!(snapshot.cursor.is_root());

    let written: serde_json::Value = serde_json::from_slice(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(written["files"], files);
}

#[test]
fn legacy_entries_survive_open_and_commit() {
    let files = json!({
        "3-AC/DC - Back in Black": "u1",
        "3-ok": "u2",
        "2-..": "dots",
        "9-x": "q",
        "n": 1
    });
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    store
        .commit(
            DEFAULT_SNAPSHOT_KEY,
            &serde_json::to_vec(&json!({ "files": files.clone(), "cursor": "/" })).unwrap(),
        )
        .unwrap();

    let kernel = Kernel::open(store.clone(), DEFAULT_SNAPSHOT_KEY).unwrap();
    let mut songs: Vec<_> = kernel.fetch_music().into_iter().map(|r| r.name).collect();
    songs.sort();
    assert_eq!(songs, vec!["AC/DC - Back in Black", "ok"]);
    assert_eq!(kernel.fetch_documents()[0].name, "..");

    kernel.add_file("new", "n", FileKind::Video).unwrap();
    let stored = store.load(DEFAULT_SNAPSHOT_KEY).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_slice(&stored).unwrap();
    let mut expected = files;
    expected["4-new"] = json!("n");
    assert_eq!(stored["files"], expected);
}

fn nested(levels: usize, leaf: serde_json::Value) -> serde_json::Value {
    (0..levels).fold(leaf, |inner, _| json!({ "d": inner }))
}

#[test]
fn deep_legacy_tree_survives_open_and_commit() {
    let files = nested(100, json!({ "2-bottom": "b", "7-odd": "o" }));
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    store
        .commit(
            DEFAULT_SNAPSHOT_KEY,
            &serde_json::to_vec(&json!({ "files": files.clone() })).unwrap(),
        )
        .unwrap();

    let kernel = Kernel::open(store.clone(), DEFAULT_SNAPSHOT_KEY).unwrap();
    assert_eq!(kernel.fetch_documents()[0].name, "bottom");
    assert_eq!(kernel.snapshot().files.height(), 100);

    kernel.add_file("top", "t", FileKind::Image).unwrap();
    let stored: serde_json::Value =
        serde_json::from_slice(&store.load(DEFAULT_SNAPSHOT_KEY).unwrap().unwrap()).unwrap();
    let mut expected = files;
    expected["1-top"] = json!("t");
    assert_eq!(stored["files"], expected);
}

#[test]
fn deep_legacy_tree_cannot_be_restored() {
    let bytes = serde_json::to_vec(&json!({ "files": nested(MAX_DEPTH + 1, json!({})) })).unwrap();
    let snapshot = Snapshot::from_json("fileSystemState", &bytes).unwrap();
    let kernel = Kernel::open(Arc::new(MemoryKvStore::new()), DEFAULT_SNAPSHOT_KEY).unwrap();
    assert!(matches!(
        kernel.restore(snapshot),
        Err(ApiError::FileSystem(FsError::TooDeep(MAX_DEPTH)))
    ));
    assert!(kernel.fetch_all().is_empty());
}

#[test]
fn serialized_snapshot_uses_encoded_keys() {
    let mut fs = deskfs::VirtualFileSystem::new();
    fs.create_folder("Docs").unwrap();
    fs.change_directory("Docs").unwrap();
    fs.create_file("plan", FileKind::Document, "p").unwrap();

    let value: serde_json::Value =
        serde_json::from_slice(&fs.snapshot().to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({"files": {"Docs": {"2-plan": "p"}}, "cursor": "/Docs"})
    );
}
