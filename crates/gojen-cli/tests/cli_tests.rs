//! Integration tests for the `gojen` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SERVICE_YAML: &str = r#"
name: service
path: "internal/{{ Domain | snake }}_service.go"
require: [Domain]
description: Service layer
elements:
  - name: init
    strategy: init
    template: |
      package service

      // +gojen:append=methods
  - name: method
    strategy: append
    alias: methods
    template: "func {{ Method }}() {}"
"#;

const SEQUENCE_YAML: &str = r#"
- decl: service
  elements: [init]
  forward: [Domain]
- decl: service
  elements: [method]
  with:
    - { Method: Get }
"#;

/// A project directory with declarations and a sequence file.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("decls")).unwrap();
    fs::write(dir.path().join("decls/service.yaml"), SERVICE_YAML).unwrap();
    fs::write(dir.path().join("seq.yaml"), SEQUENCE_YAML).unwrap();
    dir
}

/// `gojen` isolated from the user's config and environment.
fn gojen(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gojen").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join(rel)).unwrap()
}

fn audit_files(dir: &Path) -> usize {
    let runs: Vec<_> = fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(runs.len(), 1);
    fs::read_dir(runs[0].join("state")).unwrap().count()
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    gojen(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    gojen(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn run_writes_files_and_audit_trail() {
    let dir = project();

    gojen(&dir)
        .args(["run", "seq.yaml", "--decls", "decls", "--arg", "Domain=UserAccount"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Modified files:"))
        .stdout(predicate::str::contains("user_account_service.go"));

    assert_eq!(
        read(&dir, "internal/user_account_service.go"),
        "package service\n\n// +gojen:append=methods\nfunc Get() {}\n"
    );
    assert_eq!(audit_files(&dir.path().join(".gojen")), 2);
}

#[test]
fn run_prompts_for_missing_arguments() {
    let dir = project();

    gojen(&dir)
        .args(["run", "seq.yaml", "--decls", "decls", "--no-record"])
        .write_stdin("{\"Domain\": \"user\"}\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("needs [Domain]"));

    assert!(dir.path().join("internal/user_service.go").is_file());
    assert!(!dir.path().join(".gojen").exists());
}

#[test]
fn dry_run_prints_states_without_writing() {
    let dir = project();

    gojen(&dir)
        .args(["run", "seq.yaml", "-d", "decls", "-a", "Domain=user", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[0] service.init (init) -> internal/user_service.go",
        ))
        .stdout(predicate::str::contains("func Get() {}"));

    assert!(!dir.path().join("internal").exists());
    assert!(!dir.path().join(".gojen").exists());
}

#[test]
fn second_run_skips_existing_content() {
    let dir = project();
    let args = ["run", "seq.yaml", "-d", "decls", "-a", "Domain=user", "--no-record"];

    gojen(&dir).args(args).assert().success();
    let first = read(&dir, "internal/user_service.go");

    gojen(&dir)
        .args(args)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No files were modified"))
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(read(&dir, "internal/user_service.go"), first);
}

#[test]
fn comment_prefix_from_environment() {
    let dir = project();
    fs::write(
        dir.path().join("decls/service.yaml"),
        SERVICE_YAML.replace("// +gojen", "# +gojen"),
    )
    .unwrap();

    gojen(&dir)
        .env("GOJEN_APPLY__COMMENT_PREFIX", "#")
        .args(["run", "seq.yaml", "-d", "decls", "-a", "Domain=user", "--no-record"])
        .assert()
        .success();

    assert_eq!(
        read(&dir, "internal/user_service.go"),
        "package service\n\n# +gojen:append=methods\nfunc Get() {}\n"
    );
}

#[test]
fn no_color_environment_accepts_numeric_values() {
    let dir = project();
    let args = [
        "--output-format", "human", "run", "seq.yaml", "-d", "decls", "-a", "Domain=user",
        "--no-record",
    ];

    gojen(&dir)
        .env("NO_COLOR", "1")
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}[").not());

    fs::remove_dir_all(dir.path().join("internal")).unwrap();
    gojen(&dir)
        .env("NO_COLOR", "0")
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}["));
}

const HANDLER_YAML: &str = r#"
name: handler
path: "internal/{{ Domain }}_handler.go"
elements:
  - { name: grpc, strategy: init, template: grpc }
  - { name: rest, strategy: init, template: rest }
"#;

#[test]
fn quiet_run_still_shows_branch_choices() {
    let dir = project();
    fs::write(dir.path().join("decls/handler.yaml"), HANDLER_YAML).unwrap();
    fs::write(
        dir.path().join("branch.yaml"),
        "- { decl: service, elements: [init], forward: [Domain] }\n\
         - select: { decl: handler, cases: { grpc: [], rest: [] } }\n",
    )
    .unwrap();

    gojen(&dir)
        .args(["-q", "run", "branch.yaml", "-d", "decls", "-a", "Domain=user", "--no-record"])
        .write_stdin("2\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("1. grpc"))
        .stderr(predicate::str::contains("2. rest"));

    assert_eq!(read(&dir, "internal/user_handler.go"), "rest");
}

const MODEL_YAML: &str = r#"
name: model
path: "models/{{ Name | plural }}.go"
elements:
  - { name: init, strategy: init, template: "type {{ Name | singular | camel }}{{ Key | camel }} struct{}" }
"#;

fn model_project() -> TempDir {
    let dir = project();
    fs::write(dir.path().join("decls/model.yaml"), MODEL_YAML).unwrap();
    fs::write(dir.path().join("model.yaml"), "- { decl: model, elements: [init] }").unwrap();
    dir
}

#[test]
fn render_inflections_from_configuration() {
    let dir = model_project();
    fs::write(dir.path().join(".gojen.toml"), "[render.acronyms]\nid = \"ID\"\n").unwrap();

    gojen(&dir)
        .env("GOJEN_RENDER__IRREGULAR__WIDGET", "widgetry")
        .args(["run", "model.yaml", "-d", "decls", "-a", "Name=widget", "-a", "Key=id"])
        .arg("--no-record")
        .assert()
        .success();

    assert_eq!(read(&dir, "models/widgetry.go"), "type WidgetID struct{}");
}

#[test]
fn invalid_render_rule_exits_configuration() {
    let dir = model_project();
    fs::write(dir.path().join(".gojen.toml"), "[render]\nplural = [[\"(\", \"x\"]]\n").unwrap();

    gojen(&dir)
        .args(["run", "model.yaml", "-d", "decls", "-a", "Name=x", "--no-record"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("invalid plural rule"));
}

#[test]
fn missing_sequence_file_exits_not_found() {
    let dir = project();
    gojen(&dir)
        .args(["run", "nope.yaml", "-d", "decls"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Sequence file not found"));
}

#[test]
fn unknown_declaration_exits_not_found() {
    let dir = project();
    fs::write(dir.path().join("bad.yaml"), "- { decl: handler, elements: [init] }").unwrap();

    gojen(&dir)
        .args(["run", "bad.yaml", "-d", "decls", "--no-record"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Declaration 'handler' not found"));
}

#[test]
fn empty_sequence_is_a_user_error() {
    let dir = project();
    fs::write(dir.path().join("empty.yaml"), "[]").unwrap();

    gojen(&dir)
        .args(["run", "empty.yaml", "-d", "decls"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn missing_declarations_directory() {
    let dir = project();
    gojen(&dir)
        .args(["run", "seq.yaml", "-d", "elsewhere"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("declarations directory not found"));
}

#[test]
fn list_table_and_json() {
    let dir = project();

    gojen(&dir)
        .args(["list", "--decls", "decls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("service"))
        .stdout(predicate::str::contains("- method (append) alias=methods"));

    let out = gojen(&dir)
        .args(["list", "--decls", "decls", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json[0]["name"], "service");
    assert_eq!(json[0]["elements"][1]["strategy"], "append");
}

#[test]
fn local_config_sets_declarations_dir() {
    let dir = project();

    gojen(&dir)
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));
    assert!(dir.path().join(".gojen.toml").is_file());

    gojen(&dir)
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    fs::write(dir.path().join(".gojen.toml"), "[declarations]\ndir = \"decls\"\n").unwrap();
    gojen(&dir)
        .args(["config", "get", "declarations.dir"])
        .assert()
        .success()
        .stdout(predicate::str::diff("decls\n"));
    gojen(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("service"));
}

#[test]
fn config_get_unknown_key_exits_configuration() {
    let dir = TempDir::new().unwrap();
    gojen(&dir)
        .args(["config", "get", "nope.key"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn broken_config_file_exits_configuration() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.toml"), "[store\n").unwrap();
    gojen(&dir)
        .args(["--config", "bad.toml", "config", "list"])
        .assert()
        .code(4);
}

#[test]
fn completions_for_bash() {
    let dir = TempDir::new().unwrap();
    gojen(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gojen"));
}
