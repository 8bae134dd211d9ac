use log::{debug, info, trace, warn};
use std::path::{Path, PathBuf};

use crate::{
    collector::{CollectorConfig, collect_sources},
    constants::{PACKAGE_INITIALIZER, PYTHON_EXTENSION},
    error::{Error, Result},
    module::{Module, ModuleName},
};

/// All first-party modules of one source tree, owned as a strict tree under the root.
///
/// The registry is the build context for a single analysis: modules are registered
/// first, imports are attached afterwards, and nothing is shared between analyses.
#[derive(Debug)]
pub struct ModuleRegistry {
    root: Module,
    created: Vec<ModuleName>,
}

impl ModuleRegistry {
    /// Creates a registry holding only the (namespace) root package.
    pub fn new(root_name: impl Into<String>) -> Self {
        let name = ModuleName::new(root_name);
        Self { root: Module::new(name.clone(), None), created: vec![name] }
    }

    /// Registers every Python file under the configured root.
    pub fn populate(cfg: &CollectorConfig) -> Result<Self> {
        info!("Registering modules of package '{}'", cfg.root.name);
        let mut registry = Self::new(cfg.root.name.clone());

        let sources = collect_sources(cfg)?;
        if sources.is_empty() {
            info!("No Python files found under {}", cfg.root.path.display());
        }

        for path in sources {
            let Some(name) = module_name_for(&cfg.root.path, &cfg.root.name, &path) else {
                debug!("Skipping file outside of root: {}", path.display());
                continue;
            };
            let is_package = path.file_name().is_some_and(|n| n == PACKAGE_INITIALIZER);
            registry.register_source(name, path, is_package)?;
        }

        debug!("Registered {} modules", registry.created.len());
        Ok(registry)
    }

    pub fn root(&self) -> &Module {
        &self.root
    }

    pub fn module_count(&self) -> usize {
        self.created.len()
    }

    /// Module names in the order the modules were created.
    pub fn created(&self) -> &[ModuleName] {
        &self.created
    }

    /// All modules in creation order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.created.iter().filter_map(|name| self.get(name.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        let mut prefixes = dotted_prefixes(name);
        if prefixes.next()? != self.root.name().as_str() {
            return None;
        }
        let mut current = &self.root;
        for prefix in prefixes {
            current = current.children.get(prefix)?;
        }
        Some(current)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Module> {
        let mut prefixes = dotted_prefixes(name);
        if prefixes.next()? != self.root.name().as_str() {
            return None;
        }
        let mut current = &mut self.root;
        for prefix in prefixes {
            current = current.children.get_mut(prefix)?;
        }
        Some(current)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Most specific registered module whose name equals, or is a dotted prefix of,
    /// `dotted`. `None` if `dotted` does not start with the root package.
    pub fn longest_prefix(&self, dotted: &str) -> Option<&Module> {
        let mut prefixes = dotted_prefixes(dotted);
        if prefixes.next()? != self.root.name().as_str() {
            return None;
        }
        let mut current = &self.root;
        for prefix in prefixes {
            match current.children.get(prefix) {
                Some(child) => current = child,
                None => break,
            }
        }
        Some(current)
    }

    /// Returns the module called `name`, creating it and any missing ancestors as
    /// namespace packages. `None` if `name` lies outside the root package.
    pub fn register(&mut self, name: &ModuleName) -> Option<&mut Module> {
        if !self.contains(name.as_str()) {
            let parent = name.parent()?;
            self.register(&parent)?;
            trace!("Creating module '{}' under '{}'", name, parent);
            let module = Module::new(name.clone(), Some(parent.clone()));
            self.get_mut(parent.as_str())?.children.insert(name.clone(), module);
            self.created.push(name.clone());
        }
        self.get_mut(name.as_str())
    }

    /// Registers the module defined by `source`. Returns `false` if another file
    /// already defines a module of the same name, in which case `source` is ignored.
    pub fn register_source(
        &mut self,
        name: ModuleName,
        source: PathBuf,
        is_package: bool,
    ) -> Result<bool> {
        let module = self.register(&name).ok_or_else(|| Error::MissingModule(name.clone()))?;
        if let Some(existing) = module.source() {
            warn!(
                "Skipping {}: module '{}' is already defined by {}",
                source.display(),
                name,
                existing.display()
            );
            return Ok(false);
        }
        trace!("Module '{}' defined by {}", name, source.display());
        module.set_source(source, is_package);
        Ok(true)
    }
}

/// `a`, `a.b`, `a.b.c` for `a.b.c`.
fn dotted_prefixes(dotted: &str) -> impl Iterator<Item = &str> {
    dotted
        .match_indices('.')
        .map(move |(idx, _)| &dotted[..idx])
        .chain(std::iter::once(dotted))
}

/// Qualified module name of a Python file below `root`, whose package is `root_name`.
///
/// `root/__init__.py` is `root_name` itself, `root/sub/__init__.py` is
/// `root_name.sub` and `root/sub/mod.py` is `root_name.sub.mod`.
pub fn module_name_for(root: &Path, root_name: &str, path: &Path) -> Option<ModuleName> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;

    let file = segments.pop()?;
    if file != PACKAGE_INITIALIZER {
        let stem = file.strip_suffix(PYTHON_EXTENSION)?.strip_suffix('.')?;
        segments.push(stem);
    }

    let mut name = root_name.to_string();
    for segment in segments {
        name.push('.');
        name.push_str(segment);
    }
    Some(ModuleName::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::prepare_root, types::ImportKind};
    use std::{collections::BTreeSet, fs};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn populate(root: &Path) -> ModuleRegistry {
        let cfg = CollectorConfig { root: prepare_root(root).unwrap(), respect_gitignore: false };
        ModuleRegistry::populate(&cfg).unwrap()
    }

    fn names(registry: &ModuleRegistry) -> Vec<&str> {
        registry.created().iter().map(|n| n.as_str()).collect()
    }

    #[test]
    fn test_module_name_for() {
        let root = Path::new("/src/foo");
        let cases = [
            ("/src/foo/__init__.py", Some("foo")),
            ("/src/foo/bar.py", Some("foo.bar")),
            ("/src/foo/baz/__init__.py", Some("foo.baz")),
            ("/src/foo/baz/qux.py", Some("foo.baz.qux")),
            ("/src/other/bar.py", None),
            ("/src/foo/README.md", None),
        ];
        for (path, expected) in cases {
            let name = module_name_for(root, "foo", Path::new(path));
            assert_eq!(name.as_ref().map(|n| n.as_str()), expected, "path: {}", path);
        }
    }

    #[test]
    fn test_register_creates_namespace_ancestors() {
        let mut registry = ModuleRegistry::new("foo");
        registry.register(&"foo.a.b.c".into()).unwrap();

        assert_eq!(names(&registry), vec!["foo", "foo.a", "foo.a.b", "foo.a.b.c"]);
        let a = registry.get("foo.a").unwrap();
        assert!(a.source().is_none());
        assert_eq!(a.parent(), Some(&ModuleName::new("foo")));
        assert_eq!(a.imports()["foo"], BTreeSet::from([ImportKind::Parent]));
    }

    #[test]
    fn test_register_outside_root_is_rejected() {
        let mut registry = ModuleRegistry::new("foo");
        assert!(registry.register(&"bar.baz".into()).is_none());
        assert_eq!(registry.module_count(), 1);
    }

    #[test]
    fn test_register_source_skips_duplicates() {
        let mut registry = ModuleRegistry::new("foo");
        let first = registry
            .register_source("foo.a".into(), PathBuf::from("foo/a/__init__.py"), true)
            .unwrap();
        let second =
            registry.register_source("foo.a".into(), PathBuf::from("foo/a.py"), false).unwrap();

        assert!(first);
        assert!(!second);
        let module = registry.get("foo.a").unwrap();
        assert_eq!(module.source(), Some(Path::new("foo/a/__init__.py")));
        assert!(module.is_package());
    }

    #[test]
    fn test_longest_prefix() {
        let mut registry = ModuleRegistry::new("foo");
        registry.register(&"foo.bar.baz".into()).unwrap();

        let lookup = |s: &str| registry.longest_prefix(s).map(|m| m.name().as_str().to_string());
        assert_eq!(lookup("foo"), Some("foo".to_string()));
        assert_eq!(lookup("foo.bar.baz"), Some("foo.bar.baz".to_string()));
        assert_eq!(lookup("foo.bar.qux.quux"), Some("foo.bar".to_string()));
        assert_eq!(lookup("foo.nope"), Some("foo".to_string()));
        assert_eq!(lookup("foobar"), None);
        assert_eq!(lookup("os.path"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn test_populate_package() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        create_test_file(&root, "__init__.py", "");
        create_test_file(&root, "bar.py", "");
        create_test_file(&root, "baz/__init__.py", "");
        create_test_file(&root, "baz/qux.py", "");
        create_test_file(&root, "baz/quux.py", "");
        create_test_file(&root, "notes.txt", "not python");

        let registry = populate(&root);

        assert_eq!(
            names(&registry),
            vec!["foo", "foo.bar", "foo.baz", "foo.baz.quux", "foo.baz.qux"]
        );
        assert!(registry.root().source().is_some());
        assert!(registry.root().is_package());
        assert!(!registry.get("foo.bar").unwrap().is_package());
        assert!(registry.get("foo.baz").unwrap().is_package());
        assert_eq!(
            registry.root().to_string(),
            "{foo -> foo.bar, {foo.baz -> foo.baz.quux, foo.baz.qux}}"
        );
    }

    #[test]
    fn test_populate_creation_order_matches_walk() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        create_test_file(&root, "__init__.py", "");
        create_test_file(&root, "a_b.py", "");
        create_test_file(&root, "a/__init__.py", "");
        create_test_file(&root, "a/z.py", "");
        create_test_file(&root, "b.py", "");

        let registry = populate(&root);
        let walked: Vec<&str> = registry.root().walk().map(|m| m.name().as_str()).collect();

        assert_eq!(names(&registry), vec!["foo", "foo.a", "foo.a.z", "foo.a_b", "foo.b"]);
        assert_eq!(walked, names(&registry));
    }

    #[test]
    fn test_populate_namespace_packages() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        create_test_file(&root, "ns/mod.py", "");

        let registry = populate(&root);

        assert_eq!(names(&registry), vec!["foo", "foo.ns", "foo.ns.mod"]);
        assert!(registry.root().source().is_none());
        assert!(registry.get("foo.ns").unwrap().source().is_none());
        assert!(registry.get("foo.ns.mod").unwrap().source().is_some());
    }

    #[test]
    fn test_populate_package_shadows_module() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        create_test_file(&root, "__init__.py", "");
        create_test_file(&root, "a.py", "");
        create_test_file(&root, "a/__init__.py", "");

        let registry = populate(&root);

        assert_eq!(names(&registry), vec!["foo", "foo.a"]);
        assert!(registry.get("foo.a").unwrap().is_package());
    }

    #[test]
    fn test_populate_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("foo");
        fs::create_dir_all(&root).unwrap();

        let registry = populate(&root);

        assert_eq!(names(&registry), vec!["foo"]);
        assert!(registry.root().imports().is_empty());
    }
}
