//! End-to-end tests for the `graphgen init` command.
//!
//! Each test runs the binary in its own temporary directory, so the
//! default config and schema locations resolve inside it.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use graphgen_core::init::{CONFIG_COMMENT, SCHEMA_DEFAULT};

fn graphgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("graphgen").expect("binary");
    cmd.current_dir(dir);
    cmd
}

#[test]
fn fresh_init_scaffolds_a_whole_project() {
    let temp = TempDir::new().expect("tempdir");

    graphgen(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Exec \"cargo run --bin server\" to start GraphQL server",
        ));

    let schema = fs::read_to_string(temp.path().join("schema.graphql")).expect("schema");
    assert_eq!(schema, SCHEMA_DEFAULT.trim());

    let config = fs::read_to_string(temp.path().join("graphgen.yml")).expect("config");
    assert!(config.starts_with(CONFIG_COMMENT.trim()));
    assert!(config.contains("schema: schema.graphql"));
    assert!(config.contains("resolver:"));

    for generated in [
        "src/graph/model.rs",
        "src/graph/generated.rs",
        "src/graph/resolver.rs",
        "src/bin/server.rs",
    ] {
        assert!(
            temp.path().join(generated).exists(),
            "expected generated file {generated}"
        );
    }
}

#[test]
fn rerun_is_a_safe_noop() {
    let temp = TempDir::new().expect("tempdir");

    graphgen(temp.path()).arg("init").assert().success();
    let config_before = fs::read(temp.path().join("graphgen.yml")).expect("config");
    let schema_before = fs::read(temp.path().join("schema.graphql")).expect("schema");

    graphgen(temp.path())
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("config file already exists"));

    let config_after = fs::read(temp.path().join("graphgen.yml")).expect("config");
    let schema_after = fs::read(temp.path().join("schema.graphql")).expect("schema");
    assert_eq!(config_before, config_after);
    assert_eq!(schema_before, schema_after);
}

#[test]
fn existing_config_at_explicit_path_exits_zero_without_generating() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join("graphgen.yml"), "schema: schema.graphql\n").expect("config");
    fs::write(temp.path().join("schema.graphql"), "type Query { ok: Boolean! }\n")
        .expect("schema");

    graphgen(temp.path())
        .args(["init", "--config", "graphgen.yml"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("config file already exists"));

    // Nothing was rewritten and the generation stages never ran.
    let config = fs::read_to_string(temp.path().join("graphgen.yml")).expect("config");
    assert_eq!(config, "schema: schema.graphql\n");
    let schema = fs::read_to_string(temp.path().join("schema.graphql")).expect("schema");
    assert_eq!(schema, "type Query { ok: Boolean! }\n");
    assert!(!temp.path().join("src").exists());
}

#[test]
fn malformed_config_is_fatal_with_stderr_only() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join("graphgen.yml"), "schema: [unterminated").expect("config");
    fs::write(temp.path().join("schema.graphql"), "type Query { ok: Boolean! }\n")
        .expect("schema");

    graphgen(temp.path())
        .args(["init", "--config", "graphgen.yml"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("YAML"));

    // The broken file is surfaced, not silently replaced by defaults.
    let config = fs::read_to_string(temp.path().join("graphgen.yml")).expect("config");
    assert_eq!(config, "schema: [unterminated");
}

#[test]
fn broken_schema_fails_generation_after_config_write() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(
        temp.path().join("schema.graphql"),
        "union Thing = A | B\n",
    )
    .expect("schema");

    graphgen(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("schema error"));

    // The configuration was persisted before the pipeline failed; the
    // broken generation run left no generated sources behind.
    assert!(temp.path().join("graphgen.yml").exists());
    assert!(!temp.path().join("src").exists());
}

#[test]
fn overrides_flow_into_schema_config_and_server() {
    let temp = TempDir::new().expect("tempdir");

    graphgen(temp.path())
        .args([
            "init",
            "--schema",
            "api.graphql",
            "--package",
            "gen",
            "--server",
            "src/bin/api.rs",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("cargo run --bin api"));

    // The schema flag drives both the bootstrapper and the config.
    let schema = fs::read_to_string(temp.path().join("api.graphql")).expect("schema");
    assert_eq!(schema, SCHEMA_DEFAULT.trim());
    assert!(!temp.path().join("schema.graphql").exists());

    let config = fs::read_to_string(temp.path().join("graphgen.yml")).expect("config");
    assert!(config.contains("schema: api.graphql"));
    assert!(config.contains("package: gen"));

    assert!(temp.path().join("src/bin/api.rs").exists());
    assert!(!temp.path().join("src/bin/server.rs").exists());
}

#[test]
fn typemap_binds_types_instead_of_generating_them() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(
        temp.path().join("typemap.yml"),
        "User: crate::auth::User\n",
    )
    .expect("typemap");

    graphgen(temp.path())
        .args(["init", "--typemap", "typemap.yml"])
        .assert()
        .success();

    let config = fs::read_to_string(temp.path().join("graphgen.yml")).expect("config");
    assert!(config.contains("models:"));
    assert!(config.contains("model: crate::auth::User"));

    let model = fs::read_to_string(temp.path().join("src/graph/model.rs")).expect("model");
    assert!(!model.contains("pub struct User"));
    assert!(model.contains("pub struct Todo"));
}
