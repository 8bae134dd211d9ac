use indexmap::IndexMap;
use serde::Serialize;
use std::{
    borrow::Borrow,
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
};

use crate::types::ImportKind;

/// Dotted qualified name of a module, e.g. `foo.bar.baz`.
///
/// Modules are identified by name alone. Maps keyed by `ModuleName` can be queried
/// with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with the last dotted segment removed, `None` for a top-level name.
    pub fn parent(&self) -> Option<ModuleName> {
        self.0.rsplit_once('.').map(|(parent, _)| ModuleName::new(parent))
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ModuleName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModuleName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        ModuleName::new(name)
    }
}

/// A first-party Python module and the first-party modules it imports.
///
/// Ownership and imports are separate relations: a module owns its children, keyed by
/// their full name, while `imports` refers to other modules by name only and may form
/// arbitrary cycles.
#[derive(Debug)]
pub struct Module {
    name: ModuleName,
    parent: Option<ModuleName>,
    source: Option<PathBuf>,
    is_package: bool,
    pub(crate) children: IndexMap<ModuleName, Module>,
    imports: IndexMap<ModuleName, BTreeSet<ImportKind>>,
}

impl Module {
    /// Creates a module. A child module is born with its implicit `parent` import.
    pub(crate) fn new(name: ModuleName, parent: Option<ModuleName>) -> Self {
        let mut imports: IndexMap<ModuleName, BTreeSet<ImportKind>> = IndexMap::new();
        if let Some(parent) = &parent {
            imports.entry(parent.clone()).or_default().insert(ImportKind::Parent);
        }
        Self { name, parent, source: None, is_package: true, children: IndexMap::new(), imports }
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn parent(&self) -> Option<&ModuleName> {
        self.parent.as_ref()
    }

    /// Source file of this module, `None` for a namespace package without `__init__.py`.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Whether relative imports inside this module are anchored at the module itself.
    pub fn is_package(&self) -> bool {
        self.is_package
    }

    pub fn child(&self, name: &str) -> Option<&Module> {
        self.children.get(name)
    }

    pub fn imports(&self) -> &IndexMap<ModuleName, BTreeSet<ImportKind>> {
        &self.imports
    }

    pub(crate) fn set_source(&mut self, source: PathBuf, is_package: bool) {
        self.source = Some(source);
        self.is_package = is_package;
    }

    /// Merges `kind` into the tag set of the import edge to `target`.
    pub(crate) fn add_import(&mut self, target: ModuleName, kind: ImportKind) {
        self.imports.entry(target).or_default().insert(kind);
    }

    /// Pre-order traversal of this module and everything it owns.
    pub fn walk(&self) -> impl Iterator<Item = &Module> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let module = stack.pop()?;
            stack.extend(module.children.values().rev());
            Some(module)
        })
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.children.is_empty() {
            return write!(f, "{}", self.name);
        }
        write!(f, "{{{} -> ", self.name)?;
        for (idx, child) in self.children.values().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn foo_tree() -> Module {
        let mut foo = Module::new("foo".into(), None);
        for child in ["foo.bar", "foo.baz"] {
            foo.children.insert(child.into(), Module::new(child.into(), Some("foo".into())));
        }
        foo
    }

    #[test]
    fn test_module_name_parent() {
        assert_eq!(ModuleName::new("foo.bar.baz").parent(), Some(ModuleName::new("foo.bar")));
        assert_eq!(ModuleName::new("foo").parent(), None);
    }

    #[test]
    fn test_module_name_compares_equal_to_str() {
        let name = ModuleName::new("foo.bar");
        assert_eq!(name, "foo.bar");

        let mut map = HashMap::new();
        map.insert(name, 1);
        assert_eq!(map.get("foo.bar"), Some(&1));
    }

    #[test]
    fn test_child_module_starts_with_parent_import() {
        let module = Module::new("foo.bar".into(), Some("foo".into()));
        assert_eq!(module.imports().len(), 1);
        assert_eq!(module.imports()["foo"], BTreeSet::from([ImportKind::Parent]));
    }

    #[test]
    fn test_root_module_starts_without_imports() {
        let module = Module::new("foo".into(), None);
        assert!(module.imports().is_empty());
        assert!(module.parent().is_none());
    }

    #[test]
    fn test_add_import_merges_kinds() {
        let mut module = Module::new("foo.bar".into(), Some("foo".into()));
        module.add_import("foo".into(), ImportKind::Vanilla);
        module.add_import("foo".into(), ImportKind::Vanilla);
        module.add_import("foo.baz".into(), ImportKind::Dynamic);

        assert_eq!(module.imports().len(), 2);
        assert_eq!(
            module.imports()["foo"],
            BTreeSet::from([ImportKind::Vanilla, ImportKind::Parent])
        );
    }

    #[test]
    fn test_module_display() {
        assert_eq!(foo_tree().to_string(), "{foo -> foo.bar, foo.baz}");
    }

    #[test]
    fn test_walk_is_pre_order() {
        let mut foo = foo_tree();
        let bar = foo.children.get_mut("foo.bar").unwrap();
        let qux = Module::new("foo.bar.qux".into(), Some("foo.bar".into()));
        bar.children.insert("foo.bar.qux".into(), qux);

        let names: Vec<&str> = foo.walk().map(|m| m.name().as_str()).collect();
        assert_eq!(names, vec!["foo", "foo.bar", "foo.bar.qux", "foo.baz"]);
    }
}
