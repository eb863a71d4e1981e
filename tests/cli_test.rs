use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's real config
fn bucketsweep(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bucketsweep").unwrap();
    cmd.env("BUCKETSWEEP_HOME", home.path())
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

/// Local storage root with a single `docs` bucket
fn storage_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let bucket = tmp.path().join("docs");
    std::fs::create_dir_all(bucket.join("2024")).unwrap();
    std::fs::write(bucket.join(".emptyFolderPlaceholder"), "").unwrap();
    std::fs::write(bucket.join("readme.md"), "# docs").unwrap();
    std::fs::write(bucket.join("2024/.emptyFolderPlaceholder"), "").unwrap();
    std::fs::write(bucket.join("2024/report.pdf"), "%PDF").unwrap();
    tmp
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    bucketsweep(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("placeholder"))
        .stdout(predicate::str::contains("ls"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("purge"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    bucketsweep(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bucketsweep"));
}

// ─── Ls ──────────────────────────────────────────────────────────────────────

#[test]
fn test_ls_quiet_hides_system_files() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "quiet", "ls", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("readme.md"))
        .stdout(predicate::str::contains("2024/"))
        .stdout(predicate::str::contains(".emptyFolderPlaceholder").not());
}

#[test]
fn test_ls_all_shows_raw_listing() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "quiet", "ls", "docs", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".emptyFolderPlaceholder"));
}

#[test]
fn test_ls_json_output() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    let output = bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "json", "ls", "docs", "2024"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["report.pdf"]);
}

#[test]
fn test_ls_unknown_bucket_fails() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["ls", "photos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_ls_without_bucket_or_default_fails() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_bucket"));
}

// ─── Check & purge ───────────────────────────────────────────────────────────

#[test]
fn test_check_lists_without_deleting() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "quiet", "check", "docs", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024/.emptyFolderPlaceholder"));

    assert!(root.path().join("docs/2024/.emptyFolderPlaceholder").exists());
}

#[test]
fn test_purge_dry_run_keeps_files() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["purge", "docs", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(root.path().join("docs/.emptyFolderPlaceholder").exists());
}

#[test]
fn test_purge_yes_json_report() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    let output = bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "json", "purge", "docs", "2024", "--yes"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["cleanedCount"], 1);
    assert_eq!(json["removedPaths"][0], "2024/.emptyFolderPlaceholder");
    assert!(json["error"].is_null());

    assert!(!root.path().join("docs/2024/.emptyFolderPlaceholder").exists());
    assert!(root.path().join("docs/2024/report.pdf").exists());
    assert!(root.path().join("docs/.emptyFolderPlaceholder").exists());
}

#[test]
fn test_purge_declined_at_prompt() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["purge", "docs"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    assert!(root.path().join("docs/.emptyFolderPlaceholder").exists());
}

#[test]
fn test_purge_dry_run_json_is_parseable() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    let output = bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "json", "purge", "docs", "--dry-run"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["bucket"], "docs");
    assert_eq!(json["path"], "");
    assert_eq!(json["systemFiles"], serde_json::json!([".emptyFolderPlaceholder"]));
    assert!(root.path().join("docs/.emptyFolderPlaceholder").exists());
}

#[test]
fn test_purge_confirmed_json_keeps_prompt_off_stdout() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    let output = bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "json", "purge", "docs"])
        .write_stdin("y\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["cleanedCount"], 1);
    assert_eq!(json["removedPaths"][0], ".emptyFolderPlaceholder");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[y/N]"));
    assert!(stderr.contains("1 system file in"));
    assert!(!root.path().join("docs/.emptyFolderPlaceholder").exists());
}

#[test]
fn test_purge_json_nothing_to_clean() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    std::fs::create_dir_all(root.path().join("docs/clean")).unwrap();
    std::fs::write(root.path().join("docs/clean/a.txt"), "a").unwrap();

    let output = bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "json", "purge", "docs", "clean"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["cleanedCount"], 0);
}

#[test]
fn test_check_singular_count() {
    let home = TempDir::new().unwrap();
    let root = storage_root();
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["check", "docs", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 system file in"))
        .stdout(predicate::str::contains("1 system files").not());
}

#[test]
fn test_supabase_backend_without_url_fails() {
    let home = TempDir::new().unwrap();
    bucketsweep(&home)
        .env_remove("SUPABASE_URL")
        .args(["--backend", "supabase", "ls", "docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Supabase URL"));
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_home_override() {
    let home = TempDir::new().unwrap();
    bucketsweep(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains(
            home.path().to_string_lossy().to_string(),
        ));
}

#[test]
fn test_config_set_then_default_bucket_used() {
    let home = TempDir::new().unwrap();
    let root = storage_root();

    bucketsweep(&home)
        .args(["config", "set", "default_bucket", "docs"])
        .assert()
        .success();
    bucketsweep(&home)
        .args(["config", "set", "backend", "local"])
        .assert()
        .success();
    bucketsweep(&home)
        .args(["config", "set", "local_root"])
        .arg(root.path())
        .assert()
        .success();

    bucketsweep(&home)
        .args(["--format", "quiet", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("readme.md"));
}

#[test]
fn test_config_output_format_used_without_flag() {
    let home = TempDir::new().unwrap();
    let root = storage_root();

    bucketsweep(&home)
        .args(["config", "set", "output_format", "json"])
        .assert()
        .success();

    let output = bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["check", "docs", "2024"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["systemFiles"][0], "2024/.emptyFolderPlaceholder");

    // The flag still wins
    bucketsweep(&home)
        .args(["--backend", "local", "--root"])
        .arg(root.path())
        .args(["--format", "quiet", "check", "docs", "2024"])
        .assert()
        .success()
        .stdout("2024/.emptyFolderPlaceholder\n");
}

#[test]
fn test_config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    bucketsweep(&home)
        .args(["config", "set", "nonexistent_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_show() {
    let home = TempDir::new().unwrap();
    bucketsweep(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_key_env"));
}

// ─── Completions ─────────────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    bucketsweep(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bucketsweep"));
}
