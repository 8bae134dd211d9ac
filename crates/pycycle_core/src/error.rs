use std::{io, path::PathBuf};
use thiserror::Error;

use crate::module::ModuleName;

/// Errors that abort an analysis run. No partial module tree is ever returned.
#[derive(Error, Debug)]
pub enum Error {
    // Caller input problems
    #[error("Root path does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Root path is not a directory: {}", .0.display())]
    RootNotADirectory(PathBuf),

    #[error("Cannot derive a package name from root path: {}", .0.display())]
    InvalidRoot(PathBuf),

    // Reading and parsing source files
    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: syntax error at line {line}, column {column}", path.display())]
    Parse { path: PathBuf, line: usize, column: usize },

    #[error("Failed to load the Python grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    // Internal consistency failures
    #[error("Import of '{target}' in '{owner}' does not match any known module")]
    Resolution { owner: ModuleName, target: String },

    #[error("Module '{0}' is not registered")]
    MissingModule(ModuleName),
}

pub type Result<T> = std::result::Result<T, Error>;
