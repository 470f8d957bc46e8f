use deskfs::config::{DeskConfig, StorageBackend, StorageConfig};
use deskfs::tooling::{CliContext, Commands};
use deskfs::FileKind;
use serde_json::Value;
use tempfile::TempDir;

fn memory_config() -> DeskConfig {
    DeskConfig {
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn sled_config(dir: &TempDir) -> DeskConfig {
    DeskConfig {
        storage: StorageConfig {
            backend: StorageBackend::Sled,
            path: Some(dir.path().join("store")),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn json(output: &str) -> Value {
    serde_json::from_str(output).unwrap()
}

#[test]
fn add_and_fetch_json_contract() {
    let ctx = CliContext::new(memory_config()).unwrap();
    let out = ctx
        .execute(&Commands::Add {
            name: "Cat.jpg".to_string(),
            kind: FileKind::Image,
            content: "https://example.com/cat.jpg".to_string(),
        })
        .unwrap();
    assert_eq!(out, "Added image 'Cat.jpg'");

    let out = ctx
        .execute(&Commands::Fetch {
            kind: Some(FileKind::Image),
            format: "json".to_string(),
        })
        .unwrap();
    assert_eq!(
        json(&out),
        serde_json::json!([{
            "name": "Cat.jpg",
            "type": "image",
            "content": "https://example.com/cat.jpg"
        }])
    );
}

#[test]
fn fetch_apps_includes_url() {
    let ctx = CliContext::new(memory_config()).unwrap();
    ctx.execute(&Commands::Add {
        name: "Google".to_string(),
        kind: FileKind::App,
        content: "https://google.com".to_string(),
    })
    .unwrap();
    let out = ctx
        .execute(&Commands::Fetch {
            kind: Some(FileKind::App),
            format: "json".to_string(),
        })
        .unwrap();
    let apps = json(&out);
    assert_eq!(apps[0]["url"], "https://google.com");
    assert_eq!(apps[0]["type"], "app");
}

#[test]
fn folder_commands_report_outcomes() {
    let ctx = CliContext::new(memory_config()).unwrap();
    let mkdir = |name: &str| {
        ctx.execute(&Commands::Mkdir {
            name: name.to_string(),
        })
        .unwrap()
    };
    assert_eq!(mkdir("Music"), "Created folder 'Music'");
    assert_eq!(mkdir("Music"), "Folder 'Music' already exists");

    let cd = ctx
        .execute(&Commands::Cd {
            path: "Music".to_string(),
        })
        .unwrap();
    assert_eq!(cd, "/Music");
    assert_eq!(ctx.execute(&Commands::Pwd).unwrap(), "/Music");

    let missing = ctx.execute(&Commands::Cd {
        path: "/Nowhere".to_string(),
    });
    assert!(missing.is_err());
    assert_eq!(ctx.execute(&Commands::Pwd).unwrap(), "/Music");
}

#[test]
fn remove_and_reformat_messages() {
    let ctx = CliContext::new(memory_config()).unwrap();
    ctx.execute(&Commands::Add {
        name: "notes".to_string(),
        kind: FileKind::Document,
        content: "n".to_string(),
    })
    .unwrap();

    let out = ctx
        .execute(&Commands::Reformat {
            name: "notes".to_string(),
            to: FileKind::App,
            from: None,
        })
        .unwrap();
    assert_eq!(out, "Changed 'notes' from document to app");

    let out = ctx
        .execute(&Commands::Rm {
            name: "notes".to_string(),
            kind: FileKind::Document,
        })
        .unwrap();
    assert_eq!(out, "No document named 'notes'");

    let out = ctx
        .execute(&Commands::Rm {
            name: "notes".to_string(),
            kind: FileKind::App,
        })
        .unwrap();
    assert_eq!(out, "Removed app 'notes'");
}

#[test]
fn ls_json_lists_current_directory() {
    let ctx = CliContext::new(memory_config()).unwrap();
    ctx.execute(&Commands::Mkdir {
        name: "Apps".to_string(),
    })
    .unwrap();
    ctx.execute(&Commands::Add {
        name: "readme".to_string(),
        kind: FileKind::Document,
        content: "r".to_string(),
    })
    .unwrap();
    let out = ctx
        .execute(&Commands::Ls {
            path: None,
            format: "json".to_string(),
        })
        .unwrap();
    let listing = json(&out);
    assert_eq!(listing[0]["name"], "Apps");
    assert_eq!(listing[0]["type"], "directory");
    assert_eq!(listing[0]["children"], 0);
    assert_eq!(listing[1]["type"], "document");
    assert_eq!(listing[1]["content"], "r");
}

#[test]
fn invalid_format_is_rejected() {
    let ctx = CliContext::new(memory_config()).unwrap();
    let result = ctx.execute(&Commands::Status {
        format: "yaml".to_string(),
    });
    assert!(result.is_err());
}

#[test]
fn seed_then_status() {
    let ctx = CliContext::new(memory_config()).unwrap();
    let out = ctx
        .execute(&Commands::Seed {
            format: "json".to_string(),
        })
        .unwrap();
    let report = json(&out);
    assert_eq!(report["folders_created"], 5);
    assert_eq!(report["files_written"], 16);

    let status = json(
        &ctx.execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(status["backend"], "memory");
    assert_eq!(status["cursor"], "/");
    assert_eq!(status["snapshot_key"], "fileSystemState");
    assert_eq!(status["tree"]["directories"], 5);
    assert_eq!(status["tree"]["files"], 16);
}

#[test]
fn export_then_import_restores_tree() {
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("snapshot.json");

    let source = CliContext::new(memory_config()).unwrap();
    source
        .execute(&Commands::Seed {
            format: "text".to_string(),
        })
        .unwrap();
    source
        .execute(&Commands::Cd {
            path: "Videos".to_string(),
        })
        .unwrap();
    source
        .execute(&Commands::Export {
            output: Some(export_path.clone()),
        })
        .unwrap();

    let target = CliContext::new(memory_config()).unwrap();
    let out = target
        .execute(&Commands::Import {
            file: export_path.clone(),
        })
        .unwrap();
    assert!(out.starts_with("Restored 16 file(s)"));
    assert!(out.ends_with("current directory /Videos"));
    assert_eq!(target.kernel().snapshot(), source.kernel().snapshot());
}

#[test]
fn sled_backend_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let ctx = CliContext::new(sled_config(&dir)).unwrap();
        ctx.execute(&Commands::Add {
            name: "song.mp3".to_string(),
            kind: FileKind::Music,
            content: "url1".to_string(),
        })
        .unwrap();
    }
    let ctx = CliContext::new(sled_config(&dir)).unwrap();
    assert_eq!(ctx.kernel().fetch_music()[0].content, "url1");

    let status = json(
        &ctx.execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(status["backend"], "sled");
    assert!(status["store_path"].as_str().unwrap().ends_with("store"));
}

#[test]
fn config_command_renders_toml() {
    let ctx = CliContext::new(memory_config()).unwrap();
    let out = ctx.execute(&Commands::Config).unwrap();
    assert!(out.contains("backend = \"memory\""));
    assert!(out.contains("snapshot_key = \"fileSystemState\""));
}
