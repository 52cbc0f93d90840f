//! CLI integration tests
//!
//! These tests run the `cmsnap` binary against a directory-backed fetcher
//! configured through a TOML file, so no cluster is needed.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("cmsnap.toml"),
            r#"
root = "snapshots"
out = "reports"

[fetch]
workers = 2
source_dir = "platform"

[diff]
ignore = ["metadata.resourceVersion"]
"#,
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Replace the platform state of `prod/billing`.
    fn set_platform(&self, resources: serde_json::Value) {
        let scope_dir = self.path().join("platform").join("prod").join("billing");
        let _ = fs::remove_dir_all(&scope_dir);
        fs::create_dir_all(&scope_dir).unwrap();
        for (name, definition) in resources.as_object().unwrap() {
            fs::write(
                scope_dir.join(format!("{}.json", name)),
                serde_json::to_vec_pretty(definition).unwrap(),
            )
            .unwrap();
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_cmsnap"))
            .current_dir(self.path())
            .args(args)
            .output()
            .expect("Failed to execute CLI")
    }

    fn report_files(&self) -> Vec<PathBuf> {
        let dir = self.path().join("reports").join("prod").join("billing");
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }
}

const SCOPE: [&str; 4] = ["--profile", "prod", "--app", "billing"];

fn args<'a>(command: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut all = vec![command];
    all.extend(SCOPE);
    all.extend(extra);
    all
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_cli_capture_then_report() {
    // Given: a before capture
    let ws = Workspace::new();
    ws.set_platform(json!({
        "cm1": {"metadata": {"resourceVersion": "1"}, "data": {"LOG_LEVEL": "info"}},
        "cm2": {"data": {"k": "v"}}
    }));
    let out = ws.run(&args("capture", &["--label", "before"]));
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Captured 2 ConfigMaps"));

    // And: an after capture with one change and one removal
    ws.set_platform(json!({
        "cm1": {"metadata": {"resourceVersion": "7"}, "data": {"LOG_LEVEL": "debug"}}
    }));
    let out = ws.run(&args("capture", &["--label", "after"]));
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    // When: we report
    let out = ws.run(&args("report", &[]));

    // Then: the summary is printed and both artifacts exist
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("2 of 2 ConfigMaps changed"), "stdout: {}", text);
    assert!(text.contains("Report saved"));

    let files = ws.report_files();
    assert_eq!(files.len(), 2);
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert!(names[0].starts_with("prod_billing_diff_") && names[0].ends_with(".pdf"));
    assert!(names[1].starts_with("prod_billing_diff_") && names[1].ends_with(".xlsx"));
}

#[test]
fn test_cli_report_without_before_fails_with_guidance() {
    let ws = Workspace::new();
    ws.set_platform(json!({"cm1": {}}));
    assert!(ws.run(&args("capture", &["--label", "after"])).status.success());

    let out = ws.run(&args("report", &[]));

    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("Error:"));
    assert!(err.contains("--label before"), "stderr: {}", err);
    assert!(ws.report_files().is_empty());
}

#[test]
fn test_cli_capture_with_compare_reports() {
    let ws = Workspace::new();
    ws.set_platform(json!({"cm1": {"data": {"k": "v"}}}));
    assert!(ws.run(&args("capture", &["--label", "before"])).status.success());

    let out = ws.run(&args("capture", &["--label", "after", "--compare"]));

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("No differences found."));
    assert_eq!(ws.report_files().len(), 2);
}

#[test]
fn test_cli_compare_requires_after_label() {
    let ws = Workspace::new();
    ws.set_platform(json!({}));

    let out = ws.run(&args("capture", &["--label", "before", "--compare"]));

    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_cli_rejects_unknown_label() {
    let ws = Workspace::new();

    let out = ws.run(&args("capture", &["--label", "during"]));

    assert!(!out.status.success());
}

#[test]
fn test_cli_fetch_failure_exits_nonzero_and_writes_nothing() {
    // Given: the platform has no data for the scope at all
    let ws = Workspace::new();

    // When: we capture
    let out = ws.run(&args("capture", &["--label", "before"]));

    // Then: the command fails and the store stays empty
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("ERR_REMOTE"));
    let slot = ws.path().join("snapshots/prod/billing/before");
    let committed = fs::read_dir(&slot).map(|e| e.count()).unwrap_or(0);
    assert_eq!(committed, 0);
}

#[test]
fn test_cli_list_shows_snapshots_oldest_first() {
    let ws = Workspace::new();
    ws.set_platform(json!({"cm1": {}}));
    assert!(ws.run(&args("capture", &["--label", "before"])).status.success());
    assert!(ws.run(&args("capture", &["--label", "before"])).status.success());

    let out = ws.run(&args("list", &["--label", "before"]));

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let lines: Vec<String> = stdout(&out).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("before")));
    assert!(lines[0] < lines[1]);
}

#[test]
fn test_cli_root_flag_overrides_config() {
    let ws = Workspace::new();
    ws.set_platform(json!({"cm1": {}}));

    let out = ws.run(&args("capture", &["--label", "before", "--root", "elsewhere"]));

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(ws.path().join("elsewhere/prod/billing/before").is_dir());
    assert!(!ws.path().join("snapshots").exists());
}

#[test]
fn test_cli_invalid_config_is_reported() {
    let ws = Workspace::new();
    fs::write(ws.path().join("bad.toml"), "[fetch]\nworkers = 0\n").unwrap();

    let out = ws.run(&args("list", &["--config", "bad.toml"]));

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("workers"));
}
