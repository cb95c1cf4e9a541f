//! Input/output fixture pairs under `tests/fixtures`.
//!
//! Every `<name>.input.js` is migrated (with `<name>.config.json` when
//! present) and compared with `<name>.output.js`; the output is then
//! migrated again and must come back unchanged.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use qunitmod::tracing_config::init_tracing;
use qunitmod::{CodemodConfig, transform_file, transform_source};

static TRACING: Once = Once::new();

/// `QUNITMOD_LOG=debug cargo test --test fixture_tests` traces each fixture.
fn setup() {
    TRACING.call_once(init_tracing);
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("fixtures directory")
        .filter_map(|entry| {
            let file_name = entry.ok()?.file_name().into_string().ok()?;
            file_name.strip_suffix(".input.js").map(str::to_string)
        })
        .collect();
    names.sort();
    names
}

fn config_for(name: &str) -> CodemodConfig {
    let path = fixtures_dir().join(format!("{name}.config.json"));
    if path.exists() {
        CodemodConfig::from_json_file(&path).expect("fixture config")
    } else {
        CodemodConfig::default()
    }
}

fn read(name: &str, suffix: &str) -> String {
    let path = fixtures_dir().join(format!("{name}.{suffix}"));
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("{}: {err}", path.display()))
}

fn run_fixture(name: &str) {
    setup();
    let config = config_for(name);
    let input = read(name, "input.js");
    let expected = read(name, "output.js");

    let output = transform_source(&input, &config)
        .unwrap_or_else(|err| panic!("fixture {name} failed: {err:#}"));
    assert_eq!(output.code, expected, "fixture {name}");

    let again = transform_source(&output.code, &config)
        .unwrap_or_else(|err| panic!("fixture {name} output failed: {err:#}"));
    assert!(!again.changed, "fixture {name} is not idempotent:\n{}", again.code);
    assert_eq!(again.code, expected, "fixture {name} second run");
}

#[test]
fn fixtures_are_present() {
    let names = fixture_names();
    assert!(names.len() >= 6, "found {names:?}");
    for name in &names {
        assert!(
            fixtures_dir().join(format!("{name}.output.js")).exists(),
            "fixture {name} has no expected output"
        );
    }
}

#[test]
fn inject() {
    run_fixture("inject");
}

#[test]
fn nested_modules() {
    run_fixture("nested-modules");
}

#[test]
fn nested_module_with_async() {
    run_fixture("nested-module-with-async");
}

#[test]
fn rendering_actions() {
    run_fixture("rendering-actions");
}

#[test]
fn service_options() {
    run_fixture("service-options");
}

#[test]
fn model_subject() {
    run_fixture("model-subject");
}

#[test]
fn every_fixture_passes() {
    for name in fixture_names() {
        run_fixture(&name);
    }
}

#[test]
fn fixtures_migrate_from_disk() {
    setup();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("inject-test.js");
    fs::write(&path, read("inject", "input.js")).expect("write fixture");

    let output = transform_file(&path, &CodemodConfig::default()).expect("transform");
    assert_eq!(output.code, read("inject", "output.js"));
    assert!(output.report.changed());
}
