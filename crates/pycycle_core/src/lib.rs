//! Core utilities for pycycle.
//!
//! This crate turns the source tree of a Python package into a tree of first-party
//! modules with their imports attached, including:
//! - Collecting Python files from a package directory
//! - Registering modules under their dotted qualified names
//! - Parsing and classifying import statements by syntactic context
//! - Resolving imports to registered modules

mod collector;
mod config;
mod constants;
mod error;
mod module;
mod parser;
mod project;
mod registry;
mod resolver;
mod types;

// Re-export public API
pub use collector::{CollectorConfig, collect_sources};
pub use config::{ProjectRoot, prepare_root};
pub use constants::{PACKAGE_INITIALIZER, PYTHON_EXTENSION, TYPE_CHECKING_SENTINEL};
pub use error::{Error, Result};
pub use module::{Module, ModuleName};
pub use parser::{EnclosingModule, imports_for, imports_from_source};
pub use project::parse_project;
pub use registry::{ModuleRegistry, module_name_for};
pub use resolver::{attach, resolve};
pub use types::{ExtractedImport, ImportKind, ImportStatement};
