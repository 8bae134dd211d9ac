//! Names with special meaning to the Python import system.

/// Extension of importable Python source files
pub const PYTHON_EXTENSION: &str = "py";

/// File that turns a directory into a regular package
pub const PACKAGE_INITIALIZER: &str = "__init__.py";

/// Name that is only true while a static type checker runs
pub const TYPE_CHECKING_SENTINEL: &str = "TYPE_CHECKING";
