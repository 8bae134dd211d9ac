use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use log::debug;
use pycycle_core::{ImportKind, ProjectRoot, prepare_root};
use std::path::PathBuf;

use crate::{severity::SeverityMap, types::Severity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Nested module -> import -> {tags, cycle} mapping
    #[default]
    Json,
    /// Human readable list of cycles grouped by severity
    Tree,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "import-cycles")]
#[command(about = "Detect import cycles in a Python package and rate their severity")]
pub struct Config {
    /// Source directory of the top-level package
    pub root: PathBuf,

    /// Severity of cycles through imports inside functions
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub dynamic: Option<Severity>,

    /// Severity of cycles through imports under a top-level `if`
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub conditional: Option<Severity>,

    /// Severity of cycles through imports under `if TYPE_CHECKING:`
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub typing: Option<Severity>,

    /// Severity of cycles through the implicit import of a submodule's package
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub parent: Option<Severity>,

    /// Severity of cycles made of plain imports on both sides
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub vanilla: Option<Severity>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,

    /// Only export imports that are part of a cycle
    #[arg(long)]
    pub only_cycles: bool,

    /// Exit with status 1 if a cycle at least this severe is found
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub fail_on: Option<Severity>,

    /// Skip files ignored by .gitignore and .ignore files
    #[arg(long)]
    pub respect_gitignore: bool,

    #[clap(skip)]
    pub project: Option<ProjectRoot>,
}

impl Config {
    /// Configuration with default severities and output for the package at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dynamic: None,
            conditional: None,
            typing: None,
            parent: None,
            vanilla: None,
            format: OutputFormat::default(),
            compact: false,
            only_cycles: false,
            fail_on: None,
            respect_gitignore: false,
            project: None,
        }
    }

    /// Validates the root directory and derives the package name from it.
    pub fn initialize(&mut self) -> Result<()> {
        let project = prepare_root(&self.root)?;
        debug!("Initialized config for package '{}' at {:?}", project.name, project.path);
        self.project = Some(project);
        Ok(())
    }

    pub fn project(&self) -> Result<&ProjectRoot> {
        self.project.as_ref().ok_or_else(|| anyhow!("Config not initialized"))
    }

    /// Default severities with the overrides given on the command line applied.
    pub fn severity_map(&self) -> SeverityMap {
        let mut map = SeverityMap::default();
        let overrides = [
            (ImportKind::Dynamic, self.dynamic),
            (ImportKind::Conditional, self.conditional),
            (ImportKind::Typing, self.typing),
            (ImportKind::Parent, self.parent),
            (ImportKind::Vanilla, self.vanilla),
        ];
        for (kind, severity) in overrides {
            if let Some(severity) = severity {
                map.set(kind, severity);
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_defaults() {
        let cfg = Config::try_parse_from(["import-cycles", "src/foo"]).unwrap();
        assert_eq!(cfg.root, PathBuf::from("src/foo"));
        assert_eq!(cfg.format, OutputFormat::Json);
        assert!(!cfg.compact);
        assert!(!cfg.only_cycles);
        assert_eq!(cfg.fail_on, None);
        assert_eq!(cfg.severity_map(), SeverityMap::default());
    }

    #[test]
    fn test_parse_severity_overrides() {
        let cfg = Config::try_parse_from([
            "import-cycles",
            "foo",
            "--conditional",
            "good",
            "--typing",
            "bad",
            "--fail-on",
            "complicated",
        ])
        .unwrap();

        let map = cfg.severity_map();
        assert_eq!(map.conditional, Severity::Good);
        assert_eq!(map.typing, Severity::Bad);
        assert_eq!(map.dynamic, Severity::Complicated);
        assert_eq!(map.vanilla, Severity::Bad);
        assert_eq!(cfg.fail_on, Some(Severity::Complicated));
    }

    #[test]
    fn test_parse_rejects_unknown_severity() {
        let result = Config::try_parse_from(["import-cycles", "foo", "--dynamic", "terrible"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_output_options() {
        let cfg =
            Config::try_parse_from(["import-cycles", "foo", "--format", "tree", "--only-cycles"])
                .unwrap();
        assert_eq!(cfg.format, OutputFormat::Tree);
        assert!(cfg.only_cycles);
    }

    #[test]
    fn test_initialize() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        fs::create_dir_all(&root).unwrap();

        let mut cfg = Config::new(&root);
        assert!(cfg.project().is_err());
        cfg.initialize().unwrap();
        assert_eq!(cfg.project().unwrap().name, "foo");
    }

    #[test]
    fn test_initialize_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let mut cfg = Config::new(temp_dir.path().join("missing"));
        assert!(cfg.initialize().is_err());
        assert!(cfg.project.is_none());
    }
}
