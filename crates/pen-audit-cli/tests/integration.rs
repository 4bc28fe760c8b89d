#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn pen_audit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pen-audit").unwrap();
    cmd.current_dir(dir.path())
        .env("PEN_AUDIT_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn json_out(cmd: &mut Command) -> Value {
    let out = cmd.arg("--json").output().unwrap();
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).unwrap()
}

const FULL_DESIGN: &str = r#"{
  "id": "root",
  "type": "frame",
  "name": "Document",
  "children": [
    {
      "id": "food_log", "type": "frame", "name": "Food Log", "width": 390, "height": 844,
      "children": [
        {"id": "h1", "type": "frame", "name": "header", "children": [
          {"id": "t1", "type": "text", "content": "Food Log"}
        ]},
        {"id": "ml", "type": "frame", "name": "mealList", "children": [
          {"id": "r1", "type": "frame", "name": "breakfastRow"}
        ]},
        {"id": "ab", "type": "frame", "name": "addFoodButton", "children": [
          {"id": "at", "type": "text", "content": "Add Food"}
        ]}
      ]
    },
    {
      "id": "settings", "type": "frame", "name": "Settings", "width": 390, "height": 844,
      "children": [
        {"id": "sh", "type": "frame", "name": "header"},
        {"id": "st", "type": "text", "content": "Settings"}
      ]
    }
  ]
}"#;

const FOOD_LOG_ONLY: &str = r#"{
  "id": "root",
  "children": [
    {"id": "food_log", "type": "frame", "name": "Food Log", "width": 390, "height": 844,
     "children": [{"id": "t1", "type": "text", "content": "Food Log"}]}
  ]
}"#;

fn write_design(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path.display().to_string()
}

fn scan(dir: &TempDir, body: &str) {
    let design = write_design(dir, "design.json", body);
    pen_audit(dir).args(["scan", &design]).assert().success();
}

fn write_page(root: &Path, rel: &str, lines: usize) {
    let dir = root.join(rel);
    std::fs::create_dir_all(&dir).unwrap();
    let body: String = (0..lines).map(|i| format!("export const v{i} = {i};\n")).collect();
    std::fs::write(dir.join("page.tsx"), body).unwrap();
}

fn feature_status(dir: &TempDir, id: &str) -> String {
    let features = json_out(pen_audit(dir).arg("show"));
    features
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["id"] == id)
        .map(|f| f["status"].as_str().unwrap().to_string())
        .unwrap_or_else(|| panic!("{id} not in state"))
}

// ---------------------------------------------------------------------------
// pen-audit scan
// ---------------------------------------------------------------------------

#[test]
fn scan_creates_state_file() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);

    let state_path = dir.path().join(".pen-audit/state.json");
    assert!(state_path.exists());
    let state: Value = serde_json::from_str(&std::fs::read_to_string(state_path).unwrap()).unwrap();
    assert_eq!(state["scan_count"], 1);
    assert!(state["features"]["screen::settings::Settings"].is_object());
    assert!(state["features"]["screen::food_log::Food Log"].is_object());
}

#[test]
fn scan_json_reports_diff() {
    let dir = TempDir::new().unwrap();
    let design = write_design(&dir, "design.json", FULL_DESIGN);
    let first = json_out(pen_audit(&dir).args(["scan", &design]));
    assert!(first["diff"]["new"].as_u64().unwrap() >= 2);
    assert_eq!(first["diff"]["removed"], 0);

    let second = json_out(pen_audit(&dir).args(["scan", &design]));
    assert_eq!(second["diff"]["new"], 0);
    assert_eq!(second["diff"]["total"], first["diff"]["total"]);
    assert_eq!(second["scan_count"], 2);
}

#[test]
fn scan_missing_design_fails() {
    let dir = TempDir::new().unwrap();
    pen_audit(&dir)
        .args(["scan", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("design export not found"));
}

#[test]
fn scan_writes_backup_on_second_save() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    scan(&dir, FULL_DESIGN);
    assert!(dir.path().join(".pen-audit/state.json.bak").exists());
}

#[test]
fn rescan_marks_dropped_screen_removed() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    scan(&dir, FOOD_LOG_ONLY);
    assert_eq!(
        feature_status(&dir, "screen::settings::Settings"),
        "removed_from_design"
    );
    assert_eq!(feature_status(&dir, "screen::food_log::Food Log"), "open");
}

// ---------------------------------------------------------------------------
// pen-audit resolve
// ---------------------------------------------------------------------------

#[test]
fn resolved_status_survives_rescan() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    pen_audit(&dir)
        .args(["resolve", "implemented", "screen::settings::Settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 feature(s) marked implemented"));

    scan(&dir, FULL_DESIGN);
    assert_eq!(feature_status(&dir, "screen::settings::Settings"), "implemented");
}

#[test]
fn resolve_rejects_non_resolution_status() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    pen_audit(&dir)
        .args(["resolve", "open", "screen::settings"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a resolution status"));
    pen_audit(&dir)
        .args(["resolve", "done", "screen::settings"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status"));
}

#[test]
fn resolve_by_prefix_is_bulk() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    let out = json_out(pen_audit(&dir).args(["resolve", "deferred", "::settings::"]));
    let resolved = out["resolved"].as_array().unwrap();
    assert!(resolved.len() >= 2, "{out}");
    assert!(resolved
        .iter()
        .all(|id| id.as_str().unwrap().contains("::settings::")));
}

// ---------------------------------------------------------------------------
// pen-audit status / show / next
// ---------------------------------------------------------------------------

#[test]
fn status_before_any_scan() {
    let dir = TempDir::new().unwrap();
    pen_audit(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No scans yet"));
}

#[test]
fn status_counts_match_show() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    let status = json_out(pen_audit(&dir).arg("status"));
    let shown = json_out(pen_audit(&dir).arg("show"));
    assert_eq!(
        status["stats"]["total"].as_u64().unwrap() as usize,
        shown.as_array().unwrap().len()
    );
    assert_eq!(status["stats"]["pct"], 0.0);
}

#[test]
fn show_filters_by_status_and_pattern() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    pen_audit(&dir)
        .args(["resolve", "implemented", "screen::settings::Settings"])
        .assert()
        .success();

    let implemented = json_out(pen_audit(&dir).args(["show", "--status", "implemented"]));
    assert_eq!(implemented.as_array().unwrap().len(), 1);

    let food = json_out(pen_audit(&dir).args(["show", "food log"]));
    assert!(food
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["id"] == "screen::food_log::Food Log"));
}

#[test]
fn next_orders_by_tier_and_limits() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    let next = json_out(pen_audit(&dir).args(["next", "-n", "3"]));
    let items = next.as_array().unwrap();
    assert!(items.len() <= 3);
    let tiers: Vec<u64> = items.iter().map(|f| f["tier"].as_u64().unwrap()).collect();
    let mut sorted = tiers.clone();
    sorted.sort();
    assert_eq!(tiers, sorted);

    pen_audit(&dir)
        .args(["next", "--tier", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid tier"));
}

#[test]
fn state_flag_overrides_location() {
    let dir = TempDir::new().unwrap();
    let design = write_design(&dir, "design.json", FULL_DESIGN);
    pen_audit(&dir)
        .args(["--state", "custom/audit.json", "scan", &design])
        .assert()
        .success();
    assert!(dir.path().join("custom/audit.json").exists());
    assert!(!dir.path().join(".pen-audit/state.json").exists());
}

// ---------------------------------------------------------------------------
// pen-audit match
// ---------------------------------------------------------------------------

#[test]
fn match_marks_real_page_implemented() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    write_page(dir.path(), "app/food-log", 40);
    write_page(dir.path(), "app/settings", 4);

    let report = json_out(pen_audit(&dir).arg("match"));
    assert_eq!(report["total_matched"], 1);
    assert_eq!(report["total_stub"], 1);
    assert_eq!(report["matched"][0]["feature_id"], "screen::food_log::Food Log");
    assert_eq!(report["matched"][0]["matched_via"], "exact_slug");

    assert_eq!(feature_status(&dir, "screen::food_log::Food Log"), "implemented");
    assert_eq!(feature_status(&dir, "screen::settings::Settings"), "open");
}

#[test]
fn match_dry_run_leaves_state() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    write_page(dir.path(), "app/food-log", 40);

    pen_audit(&dir)
        .args(["match", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));
    assert_eq!(feature_status(&dir, "screen::food_log::Food Log"), "open");
}

#[test]
fn match_uses_app_subdir() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    write_page(dir.path(), "apps/web/app/(tabs)/food-log", 40);

    let report = json_out(pen_audit(&dir).args(["match", "--app-subdir", "apps/web"]));
    assert_eq!(report["total_matched"], 1);
}

#[test]
fn match_without_app_dir_reports_error() {
    let dir = TempDir::new().unwrap();
    scan(&dir, FULL_DESIGN);
    let out = pen_audit(&dir).args(["match", "--json"]).output().unwrap();
    assert!(!out.status.success());
    let body: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("app directory not found"));
}
