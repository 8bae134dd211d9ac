use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::{
    config::ProjectRoot,
    constants::{PACKAGE_INITIALIZER, PYTHON_EXTENSION},
    error::Result,
};

pub struct CollectorConfig {
    pub root: ProjectRoot,
    /// Honor `.gitignore`/`.ignore` files while walking
    pub respect_gitignore: bool,
}

/// Collects all Python files under the root, ordered so that every package
/// initializer comes before anything else in or below its directory.
pub fn collect_sources(cfg: &CollectorConfig) -> Result<Vec<PathBuf>> {
    debug!("Collecting Python source files");
    let root = &cfg.root.path;
    debug!("Walking directory tree from root: {}", root.display());
    let walker =
        WalkBuilder::new(root).standard_filters(cfg.respect_gitignore).hidden(false).build();

    let mut files: Vec<PathBuf> = Vec::new();
    for res in walker {
        let dent = res?;
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let p = dent.path();
        if p.extension().and_then(|e| e.to_str()) == Some(PYTHON_EXTENSION) {
            trace!("Found source file: {}", p.display());
            files.push(p.to_path_buf());
        }
    }

    files.sort_by(|a, b| processing_key(a).cmp(processing_key(b)));
    debug!("Collected {} source files", files.len());
    Ok(files)
}

/// An initializer sorts as its directory, which precedes every path below it.
fn processing_key(path: &Path) -> &Path {
    if path.file_name().is_some_and(|n| n == PACKAGE_INITIALIZER) {
        path.parent().unwrap_or(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::prepare_root;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_initializers_come_first() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        create_test_file(&root, "zeta.py", "");
        create_test_file(&root, "sub/mod.py", "");
        create_test_file(&root, "sub/__init__.py", "");
        create_test_file(&root, "__init__.py", "");
        create_test_file(&root, "alpha.py", "");

        let cfg = CollectorConfig { root: prepare_root(&root).unwrap(), respect_gitignore: false };
        let files = collect_sources(&cfg).unwrap();

        assert_eq!(
            relative(&cfg.root.path, &files),
            vec!["__init__.py", "alpha.py", "sub/__init__.py", "sub/mod.py", "zeta.py"]
        );
    }

    #[test]
    fn test_only_python_files_are_collected() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        create_test_file(&root, "__init__.py", "");
        create_test_file(&root, "data.json", "{}");
        create_test_file(&root, "stub.pyi", "");
        create_test_file(&root, "script.pyc", "");

        let cfg = CollectorConfig { root: prepare_root(&root).unwrap(), respect_gitignore: false };
        let files = collect_sources(&cfg).unwrap();

        assert_eq!(relative(&cfg.root.path, &files), vec!["__init__.py"]);
    }

    #[test]
    fn test_gitignore_is_opt_in() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        create_test_file(&root, "__init__.py", "");
        create_test_file(&root, "generated.py", "");
        create_test_file(&root, ".ignore", "generated.py\n");

        let mut cfg =
            CollectorConfig { root: prepare_root(&root).unwrap(), respect_gitignore: false };
        assert_eq!(collect_sources(&cfg).unwrap().len(), 2);

        cfg.respect_gitignore = true;
        let files = collect_sources(&cfg).unwrap();
        assert_eq!(relative(&cfg.root.path, &files), vec!["__init__.py"]);
    }
}
