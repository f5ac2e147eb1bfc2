use std::{io, path::PathBuf};

use anyhow::{Context, Result};

/// Resolves the default application directory, creating it if needed. The
/// store slot and logs both live under it.
pub fn create_application_default_path() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .context("Couldn't find a state directory for this platform")?;
    let path = base.join("worklog");

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
