use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

/// Atomically write `data` to `path` using a tempfile in the same directory.
///
/// The tempfile is synced to stable storage before it is renamed over the
/// target. When `backup` is given and the target already exists, the old
/// contents are copied there first; a failed copy is logged and ignored.
pub fn atomic_write(path: &Path, data: &[u8], backup: Option<&Path>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = Builder::new().suffix(".tmp").tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    if let Some(backup) = backup {
        if path.exists() {
            if let Err(e) = std::fs::copy(path, backup) {
                tracing::debug!("backup of {} skipped: {e}", path.display());
            }
        }
    }

    tmp.persist(path)?;
    Ok(())
}

/// Write through the atomic path, falling back to a plain overwrite when the
/// atomic path fails. Only the failure of both is returned.
pub fn durable_write(path: &Path, data: &[u8], backup: Option<&Path>) -> Result<()> {
    write_with_fallback(path, data, || atomic_write(path, data, backup))
}

fn write_with_fallback(
    path: &Path,
    data: &[u8],
    atomic: impl FnOnce() -> Result<()>,
) -> Result<()> {
    match atomic() {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!(
                "atomic write of {} failed ({e}); writing in place",
                path.display()
            );
            std::fs::write(path, data)?;
            Ok(())
        }
    }
}
