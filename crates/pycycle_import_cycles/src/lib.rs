//! Import cycle detection for Python packages.
//!
//! This crate builds the import graph of a Python package and finds every pair of
//! modules that import each other. Each cycle is rated by the weakest way in which it
//! is actually exercised: a plain import at module level on both sides is bad, while a
//! cycle closed only by an import under `if TYPE_CHECKING:` never happens at runtime.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use pycycle_import_cycles::{Config, Severity, run_import_cycle_check};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut cfg = Config::new("/path/to/project/src/foo");
//! cfg.conditional = Some(Severity::Good);
//!
//! let result = run_import_cycle_check(cfg)?;
//!
//! // Use buffered output for better performance
//! let mut stdout = BufWriter::new(std::io::stdout());
//! if result.cycles.is_empty() {
//!     pycycle_import_cycles::print_no_cycles_message(&mut stdout, &result)?;
//! } else {
//!     pycycle_import_cycles::print_cycles_tree(&mut stdout, &result)?;
//! }
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod export;
mod graph;
mod reporter;
mod severity;
mod types;

// Re-export public API
pub use checker::run_import_cycle_check;
pub use config::{Config, OutputFormat};
pub use export::{GraphDict, ImportMetadata, export};
pub use graph::{ImportEdge, ImportGraph, build_graph};
pub use reporter::{print_cycles_tree, print_graph_json, print_no_cycles_message};
pub use severity::{SeverityMap, cycle_severity, drop_one_sided_vanilla};
pub use types::{CheckResult, Cycle, Severity};
