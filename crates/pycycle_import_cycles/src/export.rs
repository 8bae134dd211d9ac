use indexmap::IndexMap;
use log::debug;
use pycycle_core::ImportKind;
use serde::{Deserialize, Serialize};

use crate::{graph::ImportGraph, types::Severity};

/// Exported view of a single import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMetadata {
    /// Import kinds, in canonical order
    pub tags: Vec<ImportKind>,
    /// Severity of the cycle this import is part of, `null` if it is not part of one
    pub cycle: Option<Severity>,
}

/// Module name to imported module name to import metadata.
pub type GraphDict = IndexMap<String, IndexMap<String, ImportMetadata>>;

/// Converts the import graph into a plain nested mapping.
///
/// Every module appears, even without imports. With `only_cycles`, imports outside
/// of any cycle are left out.
pub fn export(graph: &ImportGraph, only_cycles: bool) -> GraphDict {
    let mut dict = GraphDict::new();
    for module in graph.modules() {
        let imports: IndexMap<String, ImportMetadata> = graph
            .imports_of(module.as_str())
            .into_iter()
            .filter(|(_, edge)| !only_cycles || edge.cycle.is_some())
            .map(|(target, edge)| {
                let metadata = ImportMetadata {
                    tags: edge.tags.iter().copied().collect(),
                    cycle: edge.cycle,
                };
                (target.to_string(), metadata)
            })
            .collect();
        dict.insert(module.to_string(), imports);
    }
    debug!("Exported {} modules", dict.len());
    dict
}
