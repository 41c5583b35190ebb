use scraper_integrity::config::{default_document, SECTIONS};
use scraper_integrity::ConfigStore;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_first_run_then_update_then_reload() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConfigStore::new(temp_dir.path().join("config.json"));

    // Nothing on disk yet
    let config = store.load();
    for section in SECTIONS {
        assert!(config.section(section).is_some());
    }

    assert!(store.update_value("processing", "max_retries", json!(9)));
    assert!(store.update_value("general", "download_path", json!("/mnt/videos")));

    let reloaded = ConfigStore::new(store.path()).load();
    assert_eq!(reloaded.value("processing", "max_retries"), Some(&json!(9)));
    assert_eq!(reloaded.value("processing", "mode"), Some(&json!("direct")));
    assert_eq!(
        store.download_directory(),
        std::path::PathBuf::from("/mnt/videos")
    );
}

#[test]
fn test_hand_edited_file_keeps_unknown_keys() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConfigStore::new(temp_dir.path().join("config.json"));
    fs::write(
        store.path(),
        r#"{
  "general": {"max_storage_gb": 200, "proxy": "socks5://localhost:9050"},
  "gui": {"window": {"width": 900}}
}"#,
    )
    .unwrap();

    assert_eq!(store.max_storage_gb(), 200.0);

    // Rewrite through the store and make sure nothing was dropped
    assert!(store.update_value("batch", "batch_pages", json!(4)));
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(saved["general"]["proxy"], json!("socks5://localhost:9050"));
    assert_eq!(saved["gui"]["window"]["width"], json!(900));
    assert_eq!(saved["batch"]["batch_pages"], json!(4));
    assert_eq!(saved["logging"]["log_file_path"], json!("scraper.log"));
}

#[test]
fn test_corrupted_file_is_not_overwritten_by_load() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConfigStore::new(temp_dir.path().join("config.json"));
    fs::write(store.path(), "{ truncated").unwrap();

    assert_eq!(store.load(), default_document());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ truncated");
    assert_eq!(store.batch_config().batch_pages, 3);
}

#[test]
fn test_save_leaves_no_temporary_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConfigStore::new(temp_dir.path().join("config.json"));

    for pages in 1..=3 {
        assert!(store.update_value("batch", "batch_pages", json!(pages)));
    }

    let names: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("config.json")]);
    assert_eq!(store.batch_config().batch_pages, 3);
}
