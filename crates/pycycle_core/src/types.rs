use serde::{Deserialize, Serialize};
use std::fmt;

/// How an import statement is reached when its module is executed.
///
/// Declaration order is the order in which tags are listed in exported graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// Plain import at the top level of a module, or in a class body
    Vanilla,
    /// Guarded by `if TYPE_CHECKING:`, never executed at runtime
    Typing,
    /// Guarded by any other top-level `if`, only maybe executed
    Conditional,
    /// Somewhere inside a function, delayed until it is called
    Dynamic,
    /// Implicit link of a submodule to its package, which Python imports first
    Parent,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Vanilla => "vanilla",
            ImportKind::Typing => "typing",
            ImportKind::Conditional => "conditional",
            ImportKind::Dynamic => "dynamic",
            ImportKind::Parent => "parent",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An import as written in source, with relative imports already made absolute.
///
/// `name` is set for `from module import name` and may or may not refer to a submodule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub module: String,
    pub name: Option<String>,
}

impl ImportStatement {
    pub fn module(module: impl Into<String>) -> Self {
        Self { module: module.into(), name: None }
    }

    pub fn from_module(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self { module: module.into(), name: Some(name.into()) }
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "from {} import {}", self.module, name),
            None => write!(f, "import {}", self.module),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImport {
    pub statement: ImportStatement,
    pub kind: ImportKind,
}
