use pycycle_core::ImportKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::Severity;

/// Severity assigned to a cycle for each kind of import taking part in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityMap {
    pub dynamic: Severity,
    pub conditional: Severity,
    pub typing: Severity,
    pub parent: Severity,
    pub vanilla: Severity,
}

impl Default for SeverityMap {
    fn default() -> Self {
        Self {
            dynamic: Severity::Complicated,
            conditional: Severity::Complicated,
            typing: Severity::Skip,
            parent: Severity::Complicated,
            vanilla: Severity::Bad,
        }
    }
}

impl SeverityMap {
    pub fn get(&self, kind: ImportKind) -> Severity {
        match kind {
            ImportKind::Dynamic => self.dynamic,
            ImportKind::Conditional => self.conditional,
            ImportKind::Typing => self.typing,
            ImportKind::Parent => self.parent,
            ImportKind::Vanilla => self.vanilla,
        }
    }

    pub fn set(&mut self, kind: ImportKind, severity: Severity) {
        let slot = match kind {
            ImportKind::Dynamic => &mut self.dynamic,
            ImportKind::Conditional => &mut self.conditional,
            ImportKind::Typing => &mut self.typing,
            ImportKind::Parent => &mut self.parent,
            ImportKind::Vanilla => &mut self.vanilla,
        };
        *slot = severity;
    }
}

/// Union of the tags of both directions of a cycle, where `vanilla` only survives if
/// both directions carry it.
///
/// A plain top-level import answered by anything weaker, e.g. the implicit `parent`
/// import of a submodule, does not make a plain vanilla cycle.
pub fn drop_one_sided_vanilla(
    forward: &BTreeSet<ImportKind>,
    backward: &BTreeSet<ImportKind>,
) -> BTreeSet<ImportKind> {
    let mut tags: BTreeSet<ImportKind> = forward.union(backward).copied().collect();
    if !(forward.contains(&ImportKind::Vanilla) && backward.contains(&ImportKind::Vanilla)) {
        tags.remove(&ImportKind::Vanilla);
    }
    tags
}

/// The most severe rating among the surviving tags of a cycle.
pub fn cycle_severity(
    forward: &BTreeSet<ImportKind>,
    backward: &BTreeSet<ImportKind>,
    severities: &SeverityMap,
) -> Severity {
    drop_one_sided_vanilla(forward, backward)
        .into_iter()
        .map(|kind| severities.get(kind))
        .min()
        // only reachable with two empty tag sets, which no import edge has
        .unwrap_or(Severity::Skip)
}
