//! JSON Storage Integration Tests
//!
//! The JSON backend stores the same model as the binary one:
//! - Round-trip through a manager
//! - Checksum verification on load
//! - Header consistency on load
//! - Preset generation with `.json` names

mod common;

use syscfg::{
    ConfigManager, JsonStorage, LoadStatus, SettingValue, StorageBackend, StoreConfig,
    default_configuration,
};
use tempfile::TempDir;

fn json_manager(dir: &TempDir) -> ConfigManager<JsonStorage> {
    common::init_logging();
    ConfigManager::new(
        StoreConfig::builder()
            .config_dir(dir.path())
            .json_storage()
            .build(),
    )
}

#[test]
fn test_json_first_run_and_reload() {
    let dir = TempDir::new().unwrap();
    let mut manager = json_manager(&dir);

    assert_eq!(manager.load_or_default().unwrap(), LoadStatus::CreatedDefaults);
    assert!(dir.path().join("default.json").exists());

    manager.set("SATA_MODE", 2u8).unwrap();
    manager.save().unwrap();

    let mut second = json_manager(&dir);
    assert_eq!(second.load().unwrap(), LoadStatus::Loaded);
    assert_eq!(second.configuration(), manager.configuration());
}

#[test]
fn test_json_is_readable() {
    let dir = TempDir::new().unwrap();
    json_manager(&dir).save().unwrap();

    let text = std::fs::read_to_string(dir.path().join("default.json")).unwrap();
    assert!(text.contains("\"CPU_FREQ\""));
    assert!(text.contains("\"uint32\""));
    assert!(text.contains("\"cpu\""));
}

#[test]
fn test_json_edited_value_flags_checksum() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("default.json");
    json_manager(&dir).save().unwrap();

    // hand-edit the value without touching the stored checksum
    let text = std::fs::read_to_string(&path).unwrap();
    let edited = text.replacen("\"value\": 3200", "\"value\": 4100", 1);
    assert_ne!(text, edited);
    std::fs::write(&path, edited).unwrap();

    let mut manager = json_manager(&dir);
    let status = manager.load().unwrap();

    assert!(matches!(status, LoadStatus::ChecksumMismatch(_)));
    assert_eq!(
        manager.get("CPU_FREQ").unwrap().value(),
        &SettingValue::UInt32(4100)
    );
}

#[test]
fn test_json_rejects_invalid_document() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("default.json"), "{ not json").unwrap();

    let err = json_manager(&dir).load_or_default().unwrap_err();
    assert!(matches!(err, syscfg::Error::Serialize(_)));
}

#[test]
fn test_json_rejects_oversized_string() {
    let storage = JsonStorage::new();
    let mut config = default_configuration();
    config
        .push(
            syscfg::Setting::new(
                "BOOT_ORDER",
                syscfg::Category::Boot,
                SettingValue::string("USB,HDD").unwrap(),
                0,
                0,
            )
            .unwrap(),
        )
        .unwrap();

    let text = String::from_utf8(storage.encode(&config).unwrap()).unwrap();
    let too_long = text.replace("USB,HDD", "USB,HDD,NET,CDROM,FLOPPY");

    assert!(storage.decode(too_long.as_bytes()).is_err());
}

/// Encoded default configuration with one header field replaced
fn json_with_header_field(field: &str, value: serde_json::Value) -> Vec<u8> {
    let storage = JsonStorage::new();
    let bytes = storage.encode(&default_configuration()).unwrap();
    let mut doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    doc["header"][field] = value;
    serde_json::to_vec(&doc).unwrap()
}

#[test]
fn test_json_stale_count_is_recomputed() {
    let bytes = json_with_header_field("setting_count", serde_json::json!(3));

    let outcome = JsonStorage::new().decode(&bytes).unwrap();
    let header = outcome.config.header();

    assert!(outcome.is_intact());
    assert_eq!(header.setting_count, 12);
    assert_eq!(usize::from(header.setting_count), outcome.config.len());
    assert_eq!(header.data_size, 12 * 60);
}

#[test]
fn test_json_rejects_bad_signature() {
    let bytes = json_with_header_field("signature", serde_json::json!([0, 0, 0, 0]));

    let err = JsonStorage::new().decode(&bytes).unwrap_err();

    assert!(err.is_format_error());
    assert!(matches!(err, syscfg::Error::InvalidSignature { found: [0, 0, 0, 0] }));
}

#[test]
fn test_json_loaded_header_matches_settings() {
    let dir = TempDir::new().unwrap();
    let bytes = json_with_header_field("setting_count", serde_json::json!(3));
    std::fs::write(dir.path().join("default.json"), bytes).unwrap();

    let mut manager = json_manager(&dir);
    assert_eq!(manager.load().unwrap(), LoadStatus::Loaded);
    assert_eq!(manager.configuration().header().setting_count, 12);
    assert_eq!(&manager.configuration().header().signature, b"SYSC");
}

#[test]
fn test_json_presets() {
    let dir = TempDir::new().unwrap();
    let written = json_manager(&dir).generate_presets().unwrap();

    for name in ["default.json", "performance.json", "stability.json"] {
        let path = dir.path().join("presets").join(name);
        assert!(written.contains(&path), "{name} missing");
    }
}
