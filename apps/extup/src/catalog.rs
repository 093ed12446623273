//! Built-in migration catalog
//!
//! The declarative history of the managed extension set: package deltas
//! and configuration migrations keyed by the tool version that introduced
//! them. Registered once at startup into an explicit registry; entries
//! are append-only and must never be edited retroactively, or already
//! bootstrapped installations will miss the change.

use extup_resolver::{process_action, MigrationRegistry};
use extup_state::SettingsStore;
use extup_types::VersionOrdinal;

const IGNORED_PACKAGES_KEY: &str = "ignored_packages";

/// Extensions installed by the first-ever bootstrap run
const BASE_PACKAGES: &[&str] = &[
    "theme-boxy",
    "theme-boxy-font-addon",
    "theme-ancient",
    "editorconfig",
    "git-gutter",
    "spell-check",
    "ime-support",
    "markdown-extended",
    "linter",
    "linter-cleancode",
    "todo-review",
    "open-url",
    "extra-completion",
];

/// Packages superseded in 1.4.0 and their replacements
const DEPRECATED_1_4_0: &[&str] = &["open-url", "linter-cleancode"];
const REPLACEMENTS_1_4_0: &[&str] = &["open-anything", "clean-code"];

fn v(s: &str) -> VersionOrdinal {
    s.parse().expect("catalog version literals are well-formed")
}

/// Build the registry of built-in deltas and migration processes
pub fn build_registry(settings: &SettingsStore, preferences_document: &str) -> MigrationRegistry {
    let mut registry = MigrationRegistry::new();

    registry.register_delta(v("1.0.0"), Vec::<String>::new(), BASE_PACKAGES.to_vec());
    registry.register_delta(
        v("1.4.0"),
        DEPRECATED_1_4_0.to_vec(),
        REPLACEMENTS_1_4_0.to_vec(),
    );

    register_default_preferences(&mut registry, settings, preferences_document);
    register_git_gutter_default_off(&mut registry, settings, preferences_document);

    registry
}

/// 1.0.0: seed the editor preferences that the managed extension set
/// expects. Existing user values are left alone; the ignored list is
/// merged, not overwritten, because it doubles as the disable list.
fn register_default_preferences(
    registry: &mut MigrationRegistry,
    settings: &SettingsStore,
    preferences_document: &str,
) {
    let settings = settings.clone();
    let document = preferences_document.to_string();
    registry.register_process(
        v("1.0.0"),
        process_action(move || {
            let settings = settings.clone();
            let document = document.clone();
            async move {
                let mut doc = settings.load(&document).await?;

                let defaults: &[(&str, serde_json::Value)] = &[
                    ("color_scheme", "theme-ancient/ancient".into()),
                    ("theme", "boxy-tomorrow".into()),
                    ("font_face", "consolas".into()),
                    ("font_size", 12.into()),
                    ("fold_buttons", false.into()),
                    ("highlight_line", true.into()),
                    ("indent_to_bracket", true.into()),
                    ("show_encoding", true.into()),
                ];
                for (key, value) in defaults {
                    if doc.get(key).is_none() {
                        doc.set(*key, value.clone());
                    }
                }

                // markdown-extended needs the stock markdown package out
                // of the way; vintage stays off by default
                let mut ignored = doc.get_string_list(IGNORED_PACKAGES_KEY);
                for package in ["markdown", "vintage"] {
                    if !ignored.iter().any(|p| p == package) {
                        ignored.push(package.to_string());
                    }
                }
                doc.set_string_list(IGNORED_PACKAGES_KEY, ignored);

                settings.save(&doc).await
            }
        }),
    );
}

/// 1.4.1: git-gutter ships disabled by default; users opt in by
/// removing it from the ignored list.
fn register_git_gutter_default_off(
    registry: &mut MigrationRegistry,
    settings: &SettingsStore,
    preferences_document: &str,
) {
    let settings = settings.clone();
    let document = preferences_document.to_string();
    registry.register_process(
        v("1.4.1"),
        process_action(move || {
            let settings = settings.clone();
            let document = document.clone();
            async move {
                let mut doc = settings.load(&document).await?;
                let mut ignored = doc.get_string_list(IGNORED_PACKAGES_KEY);
                if !ignored.iter().any(|p| p == "git-gutter") {
                    ignored.push("git-gutter".to_string());
                    doc.set_string_list(IGNORED_PACKAGES_KEY, ignored);
                    settings.save(&doc).await?;
                }
                Ok(())
            }
        }),
    );
}
