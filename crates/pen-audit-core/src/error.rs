use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PenAuditError {
    #[error("design export not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("app directory not found: {}", .0.display())]
    AppDirNotFound(PathBuf),

    #[error("invalid status '{0}': expected open, implemented, deferred, out_of_scope or removed_from_design")]
    InvalidStatus(String),

    #[error("invalid tier {0}: must be 1-4")]
    InvalidTier(u8),

    #[error("'{0}' is not a resolution status: use implemented, deferred or out_of_scope")]
    NotAResolution(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for PenAuditError {
    fn from(e: tempfile::PersistError) -> Self {
        PenAuditError::Io(e.error)
    }
}

pub type Result<T> = std::result::Result<T, PenAuditError>;
