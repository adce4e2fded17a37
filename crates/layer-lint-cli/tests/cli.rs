use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LAYERS: &str = r#"{"domain": 1, "usecases": 2, "interfaces": 3, "infrastructure": 4}"#;

/// Command isolated from any global configuration on the host.
fn cmd(global_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("layer-lint").unwrap();
    cmd.env("LAYER_LINT_CONFIG_DIR", global_dir)
        .env_remove("LAYER_LINT_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn go_file(package: &str, imports: &[&str]) -> String {
    let mut src = format!("package {package}\n\n");
    for import in imports {
        src.push_str(&format!("import \"{import}\"\n"));
    }
    src
}

/// A project whose domain layer imports infrastructure.
fn violating_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "layers.json", LAYERS);
    write(
        tmp.path(),
        "domain/user/user.go",
        &go_file("user", &["fmt", "infrastructure/db"]),
    );
    write(
        tmp.path(),
        "infrastructure/db/db.go",
        &go_file("db", &["domain/user"]),
    );
    tmp
}

#[test]
fn reports_violation_and_exits_zero() {
    let global = TempDir::new().unwrap();
    let project = violating_project();

    cmd(global.path())
        .arg(project.path())
        .assert()
        .success()
        .stdout(contains(
            "error: bad dependency on 'infrastructure/db' in layer 'domain/user'",
        ))
        .stdout(contains("domain/user/user.go')"))
        .stdout(contains("in layer 'infrastructure/db'").not());
}

#[test]
fn allowed_dependencies_print_nothing() {
    let global = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "layers.json", LAYERS);
    write(
        project.path(),
        "interfaces/http/handler.go",
        &go_file("http", &["usecases/orders", "domain/order", "net/http"]),
    );

    cmd(global.path())
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn fail_on_violations_sets_exit_code() {
    let global = TempDir::new().unwrap();
    let project = violating_project();

    cmd(global.path())
        .arg(project.path())
        .arg("--fail-on-violations")
        .assert()
        .code(1)
        .stdout(contains("bad dependency"));
}

#[test]
fn json_output() {
    let global = TempDir::new().unwrap();
    let project = violating_project();

    let output = cmd(global.path())
        .args(["--format", "json"])
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_checked"], 2);
    let violations = report["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["package"], "domain/user");
    assert_eq!(violations[0]["import"]["path"], "infrastructure/db");
    assert_eq!(violations[0]["import_layer"]["rank"], 4);
}

#[test]
fn compact_output() {
    let global = TempDir::new().unwrap();
    let project = violating_project();

    cmd(global.path())
        .args(["-f", "compact"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(contains(
            "user.go:4:8: domain/user [rank 1] -> infrastructure/db [rank 4]",
        ));
}

#[test]
fn explicit_config_overrides_project_file() {
    let global = TempDir::new().unwrap();
    let project = violating_project();
    let config = TempDir::new().unwrap();
    write(config.path(), "flat.json", r#"{"domain": 4, "infrastructure": 1}"#);

    cmd(global.path())
        .arg("--config")
        .arg(config.path().join("flat.json"))
        .arg(project.path())
        .assert()
        .success()
        .stdout(contains(
            "bad dependency on 'domain/user' in layer 'infrastructure/db'",
        ))
        .stdout(contains("in layer 'domain/user'").not());
}

#[test]
fn legacy_line_config() {
    let global = TempDir::new().unwrap();
    let project = violating_project();
    let config = TempDir::new().unwrap();
    write(
        config.path(),
        "layers.cfg",
        "# innermost first\ndomain\nusecases\ninterfaces\ninfrastructure\n",
    );

    cmd(global.path())
        .arg("-c")
        .arg(config.path().join("layers.cfg"))
        .arg(project.path())
        .assert()
        .success()
        .stdout(contains("in layer 'domain/user'"));
}

#[test]
fn global_config_is_used_as_fallback() {
    let global = TempDir::new().unwrap();
    write(global.path(), "layers.json", LAYERS);
    let project = TempDir::new().unwrap();
    write(
        project.path(),
        "domain/user/user.go",
        &go_file("user", &["infrastructure/db"]),
    );

    cmd(global.path())
        .arg(project.path())
        .assert()
        .success()
        .stdout(contains("bad dependency on 'infrastructure/db'"))
        .stderr(contains("Using global config"));
}

#[test]
fn missing_config_file_fails() {
    let global = TempDir::new().unwrap();
    let project = violating_project();

    cmd(global.path())
        .arg("--config")
        .arg(project.path().join("missing.json"))
        .arg(project.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(contains("failed to read"));
}

#[test]
fn no_config_anywhere_fails() {
    let global = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "domain/a.go", &go_file("a", &[]));

    cmd(global.path())
        .arg(project.path())
        .assert()
        .failure()
        .stderr(contains("no layer configuration specified"))
        .stderr(contains("searched:"))
        .stderr(contains(".layers.toml"));
}

#[test]
fn help_describes_config_lookup() {
    let global = TempDir::new().unwrap();

    cmd(global.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("when omitted"))
        .stdout(contains("LAYER_LINT_CONFIG_DIR"));
}

#[test]
fn missing_config_error_is_not_repeated() {
    let global = TempDir::new().unwrap();
    let project = violating_project();

    let output = cmd(global.path())
        .arg("--config")
        .arg(project.path().join("missing.json"))
        .arg(project.path())
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("No such file").count(), 1, "{stderr}");
}

#[test]
fn malformed_config_fails() {
    let global = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "layers.json", r#"{"domain": "inner"}"#);

    cmd(global.path())
        .arg(project.path())
        .assert()
        .failure()
        .stderr(contains("invalid layer config"));
}

#[test]
fn missing_root_fails() {
    let global = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "layers.json", LAYERS);

    cmd(global.path())
        .arg("--config")
        .arg(project.path().join("layers.json"))
        .arg(project.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(contains("does-not-exist"));
}

#[test]
fn file_as_root_fails() {
    let global = TempDir::new().unwrap();
    let project = violating_project();

    cmd(global.path())
        .arg("--config")
        .arg(project.path().join("layers.json"))
        .arg(project.path().join("domain/user/user.go"))
        .assert()
        .failure();
}

#[test]
fn no_arguments_is_usage_error() {
    let global = TempDir::new().unwrap();

    cmd(global.path()).assert().code(2);
}

#[test]
fn unparsable_file_is_skipped() {
    let global = TempDir::new().unwrap();
    let project = violating_project();
    write(project.path(), "domain/broken/broken.go", "package broken\n\nimport (\n");

    cmd(global.path())
        .arg(project.path())
        .assert()
        .success()
        .stdout(contains("in layer 'domain/user'"))
        .stderr(contains("broken.go"));
}

#[test]
fn exclude_pattern_hides_files() {
    let global = TempDir::new().unwrap();
    let project = violating_project();

    cmd(global.path())
        .args(["--exclude", "**/domain/**"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn sequential_and_parallel_agree() {
    let global = TempDir::new().unwrap();
    let project = violating_project();
    for i in 0..10 {
        write(
            project.path(),
            &format!("domain/pkg{i}/file.go"),
            &go_file(&format!("pkg{i}"), &["interfaces/http", "usecases/orders"]),
        );
    }

    let sequential = cmd(global.path())
        .args(["-j", "1"])
        .arg(project.path())
        .output()
        .unwrap();
    let parallel = cmd(global.path())
        .args(["-j", "4"])
        .arg(project.path())
        .output()
        .unwrap();

    assert!(sequential.status.success());
    assert_eq!(sequential.stdout, parallel.stdout);
    assert_eq!(String::from_utf8_lossy(&sequential.stdout).lines().count(), 21);
}

#[test]
fn init_creates_config_then_refuses_overwrite() {
    let global = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    cmd(global.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Created"));
    let written = fs::read_to_string(dir.path().join("layers.json")).unwrap();
    assert!(written.contains("\"infrastructure\": 4"));

    cmd(global.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(contains("already exists"));

    cmd(global.path())
        .current_dir(dir.path())
        .args(["init", "--force", "--format", "toml"])
        .assert()
        .success();
    assert!(dir.path().join("layers.toml").is_file());
}

#[test]
fn layers_lists_by_rank() {
    let global = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(
        project.path(),
        "layers.json",
        r#"{"infrastructure": 4, "domain": 1, "domain/legacy": 0}"#,
    );

    let output = cmd(global.path())
        .arg("layers")
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let legacy = stdout.find("domain/legacy").unwrap();
    let domain = stdout.find("1        domain").unwrap();
    let infra = stdout.find("infrastructure").unwrap();
    assert!(legacy < domain && domain < infra);
    assert!(stdout.contains("(exempt)"));
}
