//! Integration tests for configuration loading

use extup_config::{constants, Config};
use std::io::Write;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(
        config.bootstrap.settle_delay_ms,
        constants::DEFAULT_SETTLE_DELAY_MS
    );
    assert_eq!(config.state.progress_document, constants::PROGRESS_DOCUMENT);
    assert_eq!(
        config.state.preferences_document,
        constants::PREFERENCES_DOCUMENT
    );
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_load_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[bootstrap]
settle_delay_ms = 250

[host]
packages_dir = "/tmp/pkgs"
"#
    )
    .unwrap();

    let config = Config::load(&path).await.unwrap();
    assert_eq!(config.bootstrap.settle_delay_ms, 250);
    assert_eq!(
        config.packages_dir(),
        std::path::PathBuf::from("/tmp/pkgs")
    );
    // Unset sections keep their defaults
    assert_eq!(config.state.progress_document, constants::PROGRESS_DOCUMENT);
}

#[tokio::test]
async fn test_load_missing_explicit_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(Config::load(&missing).await.is_err());

    // But load_or_default with no explicit path succeeds
    assert!(Config::load_or_default(None).await.is_ok());
}

#[tokio::test]
async fn test_load_rejects_bad_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "not = [valid").unwrap();
    assert!(Config::load(&path).await.is_err());
}

#[test]
fn test_validate_rejects_huge_settle_delay() {
    let mut config = Config::default();
    config.bootstrap.settle_delay_ms = constants::MAX_SETTLE_DELAY_MS + 1;
    assert!(config.validate().is_err());
}
