use movie_browser_lib::watchlist::Watchlist;
use tempfile::tempdir;

#[test]
fn test_missing_file_is_seeded_and_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("watchlist.json");

    let list = Watchlist::open(path.clone()).unwrap();
    assert!(!list.is_empty());
    assert!(path.exists());

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["items"].as_array().map(|a| a.len()), Some(list.len()));
}

#[test]
fn test_changes_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("watchlist.json");
    std::fs::write(&path, r#"{"items":[11,12]}"#).unwrap();

    let mut list = Watchlist::open(path.clone()).unwrap();
    assert_eq!(list.ids(), [11, 12]);
    assert!(list.add(13).unwrap());
    assert!(list.remove(11).unwrap());
    drop(list);

    let reopened = Watchlist::open(path).unwrap();
    assert_eq!(reopened.ids(), [12, 13]);
}

#[test]
fn test_cleared_list_stays_empty_on_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("watchlist.json");

    let mut list = Watchlist::open(path.clone()).unwrap();
    list.clear().unwrap();

    // An existing empty file is not reseeded
    assert!(Watchlist::open(path).unwrap().is_empty());
}

#[test]
fn test_corrupt_file_is_reseeded_from_bundle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("watchlist.json");
    std::fs::write(&path, "not json").unwrap();

    let list = Watchlist::open(path.clone()).unwrap();
    let fresh = Watchlist::open(dir.path().join("fresh.json")).unwrap();
    assert!(!list.is_empty());
    assert_eq!(list.ids(), fresh.ids());

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["items"].as_array().map(|a| a.len()), Some(list.len()));
}

#[test]
fn test_export_matches_stored_format() {
    let dir = tempdir().unwrap();
    let list = Watchlist::in_memory(vec![603, 604, 603]);
    let out = dir.path().join("export.json");
    list.export_to(&out).unwrap();

    let exported: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exported, serde_json::json!({"items": [603, 604]}));
}
