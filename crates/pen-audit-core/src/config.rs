use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// MatcherConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Directory holding the web app, relative to the project. Empty means
    /// the `app/` directory sits at the project root.
    #[serde(default)]
    pub app_subdir: String,
    /// Pages with fewer non-blank lines than this are stubs.
    #[serde(default = "default_stub_min_lines")]
    pub stub_min_lines: usize,
    /// Pages mentioning "coming soon" are stubs below this many lines.
    #[serde(default = "default_placeholder_max_lines")]
    pub placeholder_max_lines: usize,
    #[serde(default = "default_page_file")]
    pub page_file: String,
}

fn default_stub_min_lines() -> usize {
    10
}

fn default_placeholder_max_lines() -> usize {
    30
}

fn default_page_file() -> String {
    "page.tsx".to_string()
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            app_subdir: String::new(),
            stub_min_lines: default_stub_min_lines(),
            placeholder_max_lines: default_placeholder_max_lines(),
            page_file: default_page_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Overrides `.pen-audit/state.json`. Relative paths resolve against the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl Config {
    /// Read `.pen-audit/config.yaml`; a missing file yields defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes(), None)
    }

    pub fn state_path(&self, root: &Path) -> PathBuf {
        match &self.state_file {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => root.join(p),
            None => paths::state_path(root),
        }
    }
}
