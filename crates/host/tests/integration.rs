//! Integration tests for the filesystem-backed host

use extup_host::{
    DirectoryHost, DisableReason, PackageHost, RemovalOutcome, IGNORED_PACKAGES_KEY,
    PENDING_REMOVALS_KEY,
};
use extup_state::SettingsStore;
use std::path::Path;

struct Fixture {
    dir: tempfile::TempDir,
    host: DirectoryHost,
    settings: SettingsStore,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let packages = dir.path().join("packages");
    let channel = dir.path().join("channel");
    let state = dir.path().join("state");
    std::fs::create_dir_all(&packages).unwrap();
    std::fs::create_dir_all(&channel).unwrap();

    let settings = SettingsStore::new(&state);
    let host = DirectoryHost::new(
        &packages,
        &channel,
        settings.clone(),
        "preferences",
        "extup",
    );
    Fixture {
        dir,
        host,
        settings,
    }
}

fn seed_package(root: &Path, name: &str) {
    let pkg = root.join(name);
    std::fs::create_dir_all(&pkg).unwrap();
    std::fs::write(pkg.join("main.cfg"), "payload").unwrap();
}

#[tokio::test]
async fn test_installed_lists_package_directories() {
    let fx = fixture();
    assert!(fx.host.installed().await.unwrap().is_empty());

    seed_package(fx.dir.path().join("packages").as_path(), "editorconfig");
    seed_package(fx.dir.path().join("packages").as_path(), "git-gutter");
    // Stray files are not packages
    std::fs::write(fx.dir.path().join("packages/notes.txt"), "x").unwrap();

    let installed = fx.host.installed().await.unwrap();
    assert_eq!(
        installed.into_iter().collect::<Vec<_>>(),
        vec!["editorconfig".to_string(), "git-gutter".to_string()]
    );
}

#[tokio::test]
async fn test_install_copies_payload_from_channel() {
    let fx = fixture();
    seed_package(fx.dir.path().join("channel").as_path(), "todo-review");

    fx.host.install("todo-review").await.unwrap();
    assert!(fx
        .dir
        .path()
        .join("packages/todo-review/main.cfg")
        .is_file());

    // Installing again is a no-op
    fx.host.install("todo-review").await.unwrap();
}

#[tokio::test]
async fn test_install_missing_channel_package_fails() {
    let fx = fixture();
    let err = fx.host.install("ghost").await.unwrap_err();
    assert!(err.to_string().contains("not present in channel"));
}

#[tokio::test]
async fn test_disable_reenable_toggle_ignored_list() {
    let fx = fixture();
    seed_package(fx.dir.path().join("packages").as_path(), "linter");

    let affected = fx
        .host
        .disable("linter", DisableReason::Install)
        .await
        .unwrap();
    assert!(affected.contains("linter"));

    let prefs = fx.settings.load("preferences").await.unwrap();
    assert_eq!(
        prefs.get_string_list(IGNORED_PACKAGES_KEY),
        vec!["linter".to_string()]
    );

    // Disabling again affects nothing
    let affected = fx
        .host
        .disable("linter", DisableReason::Install)
        .await
        .unwrap();
    assert!(affected.is_empty());

    fx.host
        .reenable("linter", DisableReason::Install)
        .await
        .unwrap();
    let prefs = fx.settings.load("preferences").await.unwrap();
    assert!(prefs.get_string_list(IGNORED_PACKAGES_KEY).is_empty());
}

#[tokio::test]
async fn test_disable_absent_package_affects_nothing() {
    let fx = fixture();
    let affected = fx
        .host
        .disable("ghost", DisableReason::Remove)
        .await
        .unwrap();
    assert!(affected.is_empty());
}

#[tokio::test]
async fn test_remove_deletes_package_directory() {
    let fx = fixture();
    seed_package(fx.dir.path().join("packages").as_path(), "spell-check");

    let outcome = fx.host.remove("spell-check").await.unwrap();
    assert_eq!(outcome, RemovalOutcome::Completed);
    assert!(!fx.dir.path().join("packages/spell-check").exists());

    // Removing a package that is already gone still completes
    let outcome = fx.host.remove("spell-check").await.unwrap();
    assert_eq!(outcome, RemovalOutcome::Completed);
}

#[tokio::test]
async fn test_pending_removal_short_circuits_to_deferred() {
    let fx = fixture();
    seed_package(
        fx.dir.path().join("packages").as_path(),
        "markdown-extended",
    );

    let mut doc = fx.settings.load("extup").await.unwrap();
    doc.set_string_list(PENDING_REMOVALS_KEY, vec!["markdown-extended".to_string()]);
    fx.settings.save(&doc).await.unwrap();

    let outcome = fx.host.remove("markdown-extended").await.unwrap();
    assert_eq!(outcome, RemovalOutcome::Deferred);
    // Package directory is untouched until the host restart sweeps it
    assert!(fx.dir.path().join("packages/markdown-extended").is_dir());
}
