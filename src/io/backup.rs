//! Timestamped backup of a directory tree before in-place refactoring.

use crate::core::{Error, Result};
use chrono::Local;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Copies `root` to a sibling directory named
/// `<name>_backup_<YYYYmmdd_HHMMSS>` and returns the new path.
/// For a single-file root, the file itself is copied the same way.
pub fn create_backup(root: &Path) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());
    let target = root.with_file_name(format!("{name}_backup_{timestamp}"));

    if root.is_file() {
        fs::copy(root, &target).map_err(|e| Error::file_access(root, e))?;
    } else {
        copy_tree(root, &target)?;
    }
    info!("backup written to {}", target.display());
    Ok(target)
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).map_err(|e| Error::file_access(to, e))?;
    for entry in fs::read_dir(from).map_err(|e| Error::file_access(from, e))? {
        let entry = entry.map_err(|e| Error::file_access(from, e))?;
        let source = entry.path();
        let dest = to.join(entry.file_name());
        if source.is_dir() {
            copy_tree(&source, &dest)?;
        } else {
            fs::copy(&source, &dest).map_err(|e| Error::file_access(&source, e))?;
        }
    }
    Ok(())
}
