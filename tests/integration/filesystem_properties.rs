use deskfs::store::{KvStore, MemoryKvStore};
use deskfs::tree::{Snapshot, VirtualFileSystem, MAX_DEPTH};
use deskfs::views::{fetch_apps, fetch_kind, fetch_music, fetch_photos, flatten, FileRecord};
use deskfs::{FileKind, FsError, Kernel};
use proptest::prelude::*;
use std::sync::Arc;

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _-]{1,12}"
}

fn kind_strategy() -> impl Strategy<Value = FileKind> {
    prop::sample::select(FileKind::ALL.to_vec())
}

fn content_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

#[derive(Debug, Clone)]
enum Op {
    Mkdir(String),
    Cd(String),
    Up,
    Add(String, FileKind, String),
    Rm(String, FileKind),
    Rmdir(String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        name_strategy().prop_map(Op::Mkdir),
        name_strategy().prop_map(Op::Cd),
        Just(Op::Up),
        (name_strategy(), kind_strategy(), content_strategy())
            .prop_map(|(n, k, c)| Op::Add(n, k, c)),
        (name_strategy(), kind_strategy()).prop_map(|(n, k)| Op::Rm(n, k)),
        name_strategy().prop_map(Op::Rmdir),
    ]
}

fn apply(fs: &mut VirtualFileSystem, ops: &[Op]) {
    for op in ops {
        // Cd into a missing folder fails; the tree is unchanged either way.
        let _ = match op {
            Op::Mkdir(name) => fs.create_folder(name).map(|_| ()),
            Op::Cd(name) => fs.change_directory(name),
            Op::Up => fs.change_directory(".."),
            Op::Add(name, kind, content) => {
                fs.create_file(name, *kind, content.as_str()).map(|_| ())
            }
            Op::Rm(name, kind) => fs.delete_file(name, *kind).map(|_| ()),
            Op::Rmdir(name) => fs.delete_folder(name).map(|_| ()),
        };
    }
}

proptest! {
    #[test]
    fn created_file_is_fetched_by_kind(
        ops in prop::collection::vec(op_strategy(), 0..20),
        name in name_strategy(),
        kind in kind_strategy(),
        content in content_strategy(),
    ) {
        let mut fs = VirtualFileSystem::new();
        apply(&mut fs, &ops);
        fs.create_file(&name, kind, content.as_str()).unwrap();
        let found = fetch_kind(fs.files(), kind);
        prop_assert!(found.iter().any(|r| r.name == name && r.content == content && r.kind == kind));
    }

    #[test]
    fn deleted_file_disappears(
        name in name_strategy(),
        kind in kind_strategy(),
        content in content_strategy(),
    ) {
        let mut fs = VirtualFileSystem::new();
        fs.create_file(&name, kind, content.as_str()).unwrap();
        prop_assert!(fs.delete_file(&name, kind).unwrap().is_some());
        prop_assert!(flatten(fs.files()).iter().all(|r| !(r.name == name && r.kind == kind)));
        prop_assert!(fs.delete_file(&name, kind).unwrap().is_none());
    }

    #[test]
    fn rename_preserves_content_and_kind(
        old in name_strategy(),
        new in name_strategy(),
        kind in kind_strategy(),
        content in content_strategy(),
    ) {
        prop_assume!(old != new);
        let mut fs = VirtualFileSystem::new();
        fs.create_file(&old, kind, content.as_str()).unwrap();
        prop_assert!(fs.rename_file(&old, &new, kind).unwrap());
        let records = fetch_kind(fs.files(), kind);
        prop_assert!(records.iter().all(|r| r.name != old));
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(&records[0].name, &new);
        prop_assert_eq!(&records[0].content, &content);
    }

    #[test]
    fn reformat_moves_between_buckets(
        name in name_strategy(),
        from in kind_strategy(),
        to in kind_strategy(),
        content in content_strategy(),
    ) {
        prop_assume!(from != to);
        let mut fs = VirtualFileSystem::new();
        fs.create_file(&name, from, content.as_str()).unwrap();
        prop_assert!(fs.reformat_file(&name, from, to).unwrap());
        prop_assert!(fetch_kind(fs.files(), from).is_empty());
        let moved = fetch_kind(fs.files(), to);
        prop_assert_eq!(moved.len(), 1);
        prop_assert_eq!(&moved[0].name, &name);
        prop_assert_eq!(&moved[0].content, &content);
    }

    #[test]
    fn snapshot_round_trip_preserves_records(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut fs = VirtualFileSystem::new();
        apply(&mut fs, &ops);
        let bytes = fs.snapshot().to_json().unwrap();

        let mut restored = VirtualFileSystem::new();
        let snapshot = Snapshot::from_json("fileSystemState", &bytes).unwrap();
        restored.restore_fs(snapshot.files, snapshot.cursor);

        prop_assert_eq!(flatten(restored.files()), flatten(fs.files()));
        prop_assert_eq!(restored.cursor(), fs.cursor());
    }
}

#[test]
fn nested_folder_deletion_removes_everything_beneath() {
    let mut fs = VirtualFileSystem::new();
    fs.create_folder("X").unwrap();
    fs.change_directory("X").unwrap();
    fs.create_file("x-file", FileKind::Document, "d").unwrap();
    fs.create_folder("Y").unwrap();
    fs.change_directory("Y").unwrap();
    fs.create_file("y-file", FileKind::Video, "v").unwrap();
    fs.change_directory("/").unwrap();

    assert_eq!(flatten(fs.files()).len(), 2);
    fs.delete_folder("X").unwrap();
    assert!(flatten(fs.files()).is_empty());
    assert!(fs.change_directory("/X/Y").is_err());
}

#[test]
fn cat_photo_scenario() {
    let mut fs = VirtualFileSystem::new();
    fs.create_file("Cat.jpg", FileKind::Image, "https://example.com/cat.jpg")
        .unwrap();
    let photos = fetch_photos(fs.files());
    assert_eq!(
        photos,
        vec![FileRecord {
            name: "Cat.jpg".to_string(),
            kind: FileKind::Image,
            content: "https://example.com/cat.jpg".to_string(),
        }]
    );
}

#[test]
fn google_app_scenario() {
    let mut fs = VirtualFileSystem::new();
    fs.create_file("Google", FileKind::App, "https://google.com").unwrap();
    let apps = fetch_apps(fs.files());
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].file.name, "Google");
    assert_eq!(apps[0].file.kind, FileKind::App);
    assert_eq!(apps[0].file.content, "https://google.com");
    assert_eq!(apps[0].url, "https://google.com");
}

#[test]
fn duplicate_song_overwrites() {
    let mut fs = VirtualFileSystem::new();
    fs.create_file("song.mp3", FileKind::Music, "url1").unwrap();
    fs.create_file("song.mp3", FileKind::Music, "url2").unwrap();
    let music = fetch_music(fs.files());
    assert_eq!(music.len(), 1);
    assert_eq!(music[0].content, "url2");
}

#[test]
fn deepest_tree_survives_round_trip_and_reopen() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let kernel = Kernel::open(store.clone(), "fileSystemState").unwrap();
    for level in 0..MAX_DEPTH {
        kernel.add_directory(&format!("level{}", level)).unwrap();
        kernel.change_directory(&format!("level{}", level)).unwrap();
    }
    kernel.add_file("bottom", "b", FileKind::Document).unwrap();
    assert!(matches!(
        kernel.add_directory("one-too-many"),
        Err(deskfs::ApiError::FileSystem(FsError::TooDeep(MAX_DEPTH)))
    ));

    let bytes = kernel.snapshot().to_json().unwrap();
    let decoded = Snapshot::from_json("fileSystemState", &bytes).unwrap();
    assert_eq!(decoded, kernel.snapshot());
    drop(kernel);

    let reopened = Kernel::open(store, "fileSystemState").unwrap();
    assert_eq!(reopened.cursor().segments().len(), MAX_DEPTH);
    assert_eq!(reopened.fetch_documents()[0].name, "bottom");
}

#[test]
fn exported_json_has_no_duplicate_keys() {
    let mut fs = VirtualFileSystem::new();
    fs.create_file("Cat", FileKind::Image, "u").unwrap();
    assert!(matches!(fs.create_folder("1-Cat"), Err(FsError::InvalidName(_))));
    fs.create_folder("2024 Photos").unwrap();
    fs.create_file("24 Photos", FileKind::Document, "d").unwrap();

    let bytes = fs.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let files = value["files"].as_object().unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(files["1-Cat"], "u");
    assert!(files["2024 Photos"].is_object());
    assert_eq!(files["2-24 Photos"], "d");
}
