pub mod matching;
pub mod next;
pub mod resolve;
pub mod scan;
pub mod show;
pub mod status;

use anyhow::Context as _;
use pen_audit_core::{config::Config, state::State};
use std::path::PathBuf;

/// Everything a command needs, resolved once at startup.
pub struct Context {
    pub root: PathBuf,
    pub config: Config,
    pub state_path: PathBuf,
    pub json: bool,
}

impl Context {
    pub fn load(root: PathBuf, state: Option<PathBuf>, json: bool) -> anyhow::Result<Self> {
        let config = Config::load(&root).context("failed to load .pen-audit/config.yaml")?;
        let state_path = state.unwrap_or_else(|| config.state_path(&root));
        Ok(Self {
            root,
            config,
            state_path,
            json,
        })
    }

    pub fn load_state(&self) -> State {
        State::load(&self.state_path)
    }

    pub fn save_state(&self, state: &mut State) -> anyhow::Result<()> {
        state
            .save(&self.state_path)
            .with_context(|| format!("failed to save {}", self.state_path.display()))
    }
}
