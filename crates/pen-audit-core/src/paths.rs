use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PEN_AUDIT_DIR: &str = ".pen-audit";
pub const STATE_FILE: &str = ".pen-audit/state.json";
pub const CONFIG_FILE: &str = ".pen-audit/config.yaml";

pub const BACKUP_EXTENSION: &str = "json.bak";

/// Route manifests are looked up in this order, relative to the project root.
pub const ROUTE_MANIFESTS: &[&str] = &["contracts/routes.json", "routes.json"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn pen_audit_dir(root: &Path) -> PathBuf {
    root.join(PEN_AUDIT_DIR)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Sibling of a state file holding the previous saved version.
pub fn backup_path(state_path: &Path) -> PathBuf {
    state_path.with_extension(BACKUP_EXTENSION)
}

pub fn route_manifest_candidates(project: &Path) -> Vec<PathBuf> {
    ROUTE_MANIFESTS.iter().map(|rel| project.join(rel)).collect()
}

/// `<project>/<app_subdir>/app`, or `<project>/app` when no subdirectory is set.
pub fn app_dir(project: &Path, app_subdir: &str) -> PathBuf {
    if app_subdir.is_empty() {
        project.join("app")
    } else {
        project.join(app_subdir).join("app")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
