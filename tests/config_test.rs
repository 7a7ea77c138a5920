//! Integration tests for layered Settings loading.
//!
//! These tests only use explicit config files in temp directories; env
//! overrides live in their own test binary so variables cannot leak.

use std::fs;

use tempfile::TempDir;

use phylotree::application::ApplicationError;
use phylotree::config::{RenderStyle, Settings};
use phylotree::domain::DeletePolicy;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("phylotree.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_config_file_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
indent_width = 4
render_style = "tree"
lineage_separator = " / "
delete_policy = "reject-non-leaf"
edit_mode = true
"#,
    );

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.indent_width, 4);
    assert_eq!(settings.render_style, RenderStyle::Tree);
    assert_eq!(settings.lineage_separator, " / ");
    assert_eq!(settings.delete_policy, DeletePolicy::RejectNonLeaf);
    assert!(settings.edit_mode);
}

#[test]
fn given_partial_config_file_when_load_then_keeps_defaults_for_rest() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "delete_policy = \"cascade\"\n");

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.delete_policy, DeletePolicy::Cascade);
    assert_eq!(settings.lineage_separator, " > ");
}

#[test]
fn given_unknown_key_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "colour = \"green\"\n");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_invalid_policy_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "delete_policy = \"shred\"\n");

    assert!(matches!(
        Settings::load(Some(&path)).unwrap_err(),
        ApplicationError::Config { .. }
    ));
}

#[test]
fn given_zero_indent_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "indent_width = 0\n");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("indent_width"));
}

#[test]
fn given_missing_file_when_load_then_operation_failed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn given_effective_settings_when_shown_then_toml_lists_every_key() {
    let text = Settings::default().to_toml().unwrap();
    for key in [
        "indent_width",
        "render_style",
        "lineage_separator",
        "delete_policy",
        "edit_mode",
    ] {
        assert!(text.contains(key), "missing {key} in:\n{text}");
    }
}
