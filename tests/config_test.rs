//! Integration tests for layered Settings loading.
//!
//! These tests assume no global config is present, so the local file is
//! layered directly onto the compiled defaults.

use std::fs;

use tempfile::TempDir;

use treekit::application::ApplicationError;
use treekit::config::Settings;
use treekit::domain::DomainError;
use treekit::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

// ============================================================
// Settings::load() local file tests
// ============================================================

#[test]
fn given_local_file_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treekit.toml");
    fs::write(
        &path,
        r#"
[builder]
max_nodes = 4

[render]
missing_child = "-"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.builder.max_nodes, Some(4));
    assert_eq!(settings.render.missing_child, "-");
    // Unspecified keys keep their defaults
    assert_eq!(settings.render.empty_tree, "(empty)");
}

#[test]
fn given_missing_local_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result = Settings::load(Some(&path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[builder\nmax_nodes = ").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("broken.toml"), "unexpected message: {}", err);
}

#[test]
fn given_wrong_value_type_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treekit.toml");
    fs::write(&path, "[builder]\nmax_nodes = \"many\"\n").unwrap();

    assert!(matches!(
        Settings::load(Some(&path)),
        Err(ApplicationError::Config { .. })
    ));
}

// ============================================================
// Builder wiring tests
// ============================================================

#[test]
fn given_node_limit_when_building_through_settings_then_limit_enforced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treekit.toml");
    fs::write(&path, "[builder]\nmax_nodes = 2\n").unwrap();
    let settings = Settings::load(Some(&path)).unwrap();

    let builder = settings.tree_builder();

    assert!(builder.from_traversals(&[1, 2], &[2, 1]).is_ok());
    assert!(matches!(
        builder.from_traversals(&[1, 2, 3], &[3, 2, 1]),
        Err(DomainError::MalformedInput(_))
    ));
}

#[test]
fn given_domain_error_when_converted_then_wrapped_transparently() {
    let err: ApplicationError = DomainError::PreconditionViolated("k out of range".into()).into();
    assert!(matches!(err, ApplicationError::Domain(_)));
    assert!(err.to_string().contains("k out of range"));
}
