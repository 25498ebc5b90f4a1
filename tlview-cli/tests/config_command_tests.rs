//! Integration tests for `tlview config` command.
//!
//! Tests config validation and display functionality with real TOML files.

use std::fs;
use tempfile::TempDir;

use tlview_core::config::TlviewConfig;

#[tokio::test]
async fn test_config_validate_valid_toml() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("tlview.toml");

    let valid_config = r#"
[general]
log_level = "info"
log_format = "json"

[decode]
strict = false

[store]
enabled = true
key = "last-trace"
"#;

    fs::write(&config_path, valid_config).expect("should write config");

    // When: Loading the config
    let result = TlviewConfig::load(&config_path).await;

    // Then: Should succeed
    assert!(result.is_ok(), "valid config should load successfully");
    let config = result.expect("config should load");
    assert!(!config.decode.strict);
    assert_eq!(config.store.key, "last-trace");
}

#[tokio::test]
async fn test_config_validate_malformed_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");

    fs::write(&config_path, "[general\nlog_level = \"info\"\n").expect("should write bad config");

    let result = TlviewConfig::load(&config_path).await;
    assert!(result.is_err(), "malformed TOML should fail to load");
}

#[tokio::test]
async fn test_config_validate_missing_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("nonexistent.toml");

    let result = TlviewConfig::load(&config_path).await;
    assert!(result.is_err(), "missing file should fail to load");

    // 다른 명령은 기본값으로 시작
    let fallback = TlviewConfig::load_or_default(&config_path).await;
    assert!(fallback.is_ok(), "missing file should fall back to defaults");
}

#[tokio::test]
async fn test_config_validate_empty_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("empty.toml");
    fs::write(&config_path, "").expect("should write empty config");

    let config = TlviewConfig::load(&config_path)
        .await
        .expect("empty config should use defaults");
    assert!(config.decode.strict, "strict decoding by default");
    assert!(config.store.enabled, "store enabled by default");
    assert_eq!(config.schema.descriptor_event, "describe_tensor");
}

#[tokio::test]
async fn test_config_rejects_store_key_with_separator() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("tlview.toml");
    fs::write(&config_path, "[store]\nkey = \"../escape\"\n").expect("should write config");

    let result = TlviewConfig::load(&config_path).await;
    assert!(result.is_err(), "store key must be a plain file name");
}

#[tokio::test]
async fn test_config_custom_schema() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("tlview.toml");

    let config = r#"
[schema]
string_table_field = "strings"
descriptor_event = "describe_storage"
reference_event = "describe_view"
correlation_field = "storage_id"
identity_fields = ["id", "storage_id"]

[[schema.interned]]
event = "compile_start"
list = "frames"
field = "file"
"#;
    fs::write(&config_path, config).expect("should write config");

    let config = TlviewConfig::load(&config_path)
        .await
        .expect("custom schema should load");
    assert_eq!(config.schema.correlation_field, "storage_id");
    assert_eq!(config.schema.interned.len(), 1);
    assert_eq!(config.schema.interned[0].list, "frames");
}

#[tokio::test]
async fn test_config_unicode_data_dir() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("tlview.toml");
    fs::write(&config_path, "[general]\ndata_dir = \"/tmp/데이터\"\n").expect("should write config");

    let config = TlviewConfig::load(&config_path)
        .await
        .expect("unicode config should load");
    assert!(config.general.data_dir.contains("데이터"));
}
