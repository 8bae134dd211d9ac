use clap::ValueEnum;
use pycycle_core::{ImportKind, ModuleName};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::export::GraphDict;

/// How much of a problem an import cycle is.
///
/// Ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Bad,
    Complicated,
    Good,
    Skip,
}

impl Severity {
    pub const ALL: [Severity; 4] =
        [Severity::Bad, Severity::Complicated, Severity::Good, Severity::Skip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Bad => "bad",
            Severity::Complicated => "complicated",
            Severity::Good => "good",
            Severity::Skip => "skip",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two modules that import each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub modules: (ModuleName, ModuleName),
    pub severity: Severity,
    /// Tags of the import from the first module to the second
    pub forward: Vec<ImportKind>,
    /// Tags of the import from the second module to the first
    pub backward: Vec<ImportKind>,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub package: String,
    pub graph: GraphDict,
    pub cycles: Vec<Cycle>,
    pub modules_analyzed: usize,
}

impl CheckResult {
    pub fn worst_severity(&self) -> Option<Severity> {
        self.cycles.iter().map(|c| c.severity).min()
    }

    /// Whether any cycle is at least as severe as `threshold`.
    pub fn has_cycles_at_least(&self, threshold: Severity) -> bool {
        self.worst_severity().is_some_and(|worst| worst <= threshold)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.cycles.iter().filter(|c| c.severity == severity).count()
    }
}
