//! Integration tests for file-backed configuration sources.

use mobforge_config::{
    fill_if_empty, synchronize_with_template, ConfigDocument, ConfigError, ConfigSource,
    FileSource, Templates,
};

// =========================================================================
// load()
// =========================================================================

#[test]
fn test_load_missing_file_is_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::json(dir.path().join("config.json"));

    let doc = source.load().unwrap();

    assert!(doc.keys("").is_empty());
}

#[test]
fn test_load_blank_file_is_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "  \n").unwrap();

    let doc = FileSource::json(&path).load().unwrap();

    assert!(doc.keys("").is_empty());
}

#[test]
fn test_load_malformed_file_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ arenas: ").unwrap();

    let result = FileSource::json(&path).load();

    assert!(matches!(result, Err(ConfigError::Decode(_))));
}

// =========================================================================
// save()
// =========================================================================

#[test]
fn test_save_then_load_preserves_key_order() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::json(dir.path().join("nested").join("config.json"));
    let mut doc = ConfigDocument::new();
    doc.set("arenas.zeta.settings.world", "world");
    doc.set("arenas.alpha.settings.world", "nether");

    source.save(&doc).unwrap();
    let loaded = source.load().unwrap();

    assert_eq!(loaded.keys("arenas"), vec!["zeta", "alpha"]);
    assert_eq!(loaded, doc);
}

#[test]
fn test_hand_edit_is_seen_on_next_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let source = FileSource::json(&path);
    let mut doc = ConfigDocument::new();
    doc.set("global-settings.enabled", true);
    source.save(&doc).unwrap();

    std::fs::write(&path, r#"{"global-settings": {"enabled": false}}"#).unwrap();

    let reloaded = source.load().unwrap();
    assert!(!reloaded.get_bool("global-settings.enabled", true));
}

// =========================================================================
// Reconciliation against bundled templates
// =========================================================================

#[test]
fn test_fresh_arena_section_matches_bundled_shape() {
    let templates = Templates::bundled();
    let mut doc = ConfigDocument::new();
    doc.set("arenas.a1.settings.legacy-key", 1);

    synchronize_with_template(doc.make_section("arenas.a1.settings"), &templates.arena_settings);
    fill_if_empty(doc.make_section("arenas.a1.waves"), &templates.waves);

    let settings = doc.keys("arenas.a1.settings");
    let expected: Vec<String> = templates.arena_settings.keys().cloned().collect();
    assert_eq!(settings, expected);
    assert_eq!(doc.keys("arenas.a1.waves"), vec!["recurrent", "single"]);
}
