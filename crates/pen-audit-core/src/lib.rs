pub mod config;
pub mod detectors;
pub mod error;
pub mod feature;
pub mod io;
pub mod matcher;
pub mod node;
pub mod paths;
pub mod state;
pub mod stats;
pub mod tier;
pub mod types;

pub use error::{PenAuditError, Result};
