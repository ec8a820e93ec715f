use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::DataError;

/// Creates `<root>/<id>/` and drops a copy of the running executable
/// beside the data, so every output folder records the exact program
/// that produced it.
pub fn participant_dir(root: &Path, id: &str) -> Result<PathBuf, DataError> {
    let dir = root.join(id);
    fs::create_dir_all(&dir)?;

    let exe = env::current_exe()?;
    let copy = dir.join(format!("{}_code{}", id, env::consts::EXE_SUFFIX));
    fs::copy(&exe, &copy)?;

    info!("participant folder ready at {}", dir.display());
    Ok(dir)
}

/// Ids that already have a folder under the data root, used for the
/// uniqueness check at intake. The root is created on first use.
pub fn existing_ids(root: &Path) -> Result<Vec<String>, DataError> {
    fs::create_dir_all(root)?;
    let mut ids = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(ids)
}
