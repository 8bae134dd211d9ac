use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Validated source directory of the package under analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    /// Canonical path of the directory
    pub path: PathBuf,
    /// Name of the top-level package, i.e. the directory's name
    pub name: String,
}

/// Checks that `root` is an existing directory and derives the package name from it.
///
/// The name comes from the path as given (after cleaning), so a symlinked source
/// directory keeps the name it is imported by.
pub fn prepare_root(root: &Path) -> Result<ProjectRoot> {
    debug!("Preparing root directory: {:?}", root);
    if !root.exists() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::RootNotADirectory(root.to_path_buf()));
    }

    let cleaned = clean(root);
    let path = root.canonicalize().unwrap_or_else(|_| cleaned.clone());
    trace!("Cleaned root {:?}, canonical root {:?}", cleaned, path);

    let name = cleaned
        .file_name()
        .or_else(|| path.file_name())
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidRoot(root.to_path_buf()))?;

    debug!("Using package name '{}' for {}", name, path.display());
    Ok(ProjectRoot { path, name })
}
