use log::{debug, trace, warn};
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use pycycle_core::{ImportKind, ModuleName, ModuleRegistry};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{
    severity::{SeverityMap, cycle_severity},
    types::{Cycle, Severity},
};

/// An import of one module by another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    pub tags: BTreeSet<ImportKind>,
    /// Severity of the cycle this edge is part of, if the target imports the source back
    pub cycle: Option<Severity>,
}

/// Directed import graph over all modules of a package.
///
/// Nodes are added in module creation order and edges in the order their imports were
/// first seen, which is the order everything is exported in.
#[derive(Debug, Default)]
pub struct ImportGraph {
    graph: DiGraph<ModuleName, ImportEdge>,
    nodes: HashMap<ModuleName, NodeIndex>,
}

impl ImportGraph {
    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleName> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Outgoing imports of `module`, in insertion order.
    pub fn imports_of(&self, module: &str) -> Vec<(&ModuleName, &ImportEdge)> {
        let Some(&idx) = self.nodes.get(module) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest first
        let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Outgoing).collect();
        edges.sort_by_key(|e| e.id().index());
        edges.into_iter().map(|e| (&self.graph[e.target()], e.weight())).collect()
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&ImportEdge> {
        let (&a, &b) = (self.nodes.get(from)?, self.nodes.get(to)?);
        self.graph.find_edge(a, b).map(|e| &self.graph[e])
    }

    /// Every pair of mutually importing modules once, in the direction first seen.
    ///
    /// A module importing itself is reported as a cycle with itself.
    pub fn cycles(&self) -> Vec<Cycle> {
        let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        let mut cycles = Vec::new();
        for e in self.graph.edge_references() {
            let Some(severity) = e.weight().cycle else {
                continue;
            };
            let (a, b) = (e.source(), e.target());
            if !seen.insert((a.min(b), a.max(b))) {
                continue;
            }
            let backward = self.graph.find_edge(b, a).map(|r| &self.graph[r].tags);
            cycles.push(Cycle {
                modules: (self.graph[a].clone(), self.graph[b].clone()),
                severity,
                forward: e.weight().tags.iter().copied().collect(),
                backward: backward.into_iter().flatten().copied().collect(),
            });
        }
        cycles
    }

    fn add_module(&mut self, name: &ModuleName) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        self.nodes.insert(name.clone(), idx);
        idx
    }
}

/// Builds the import graph of a fully parsed package and rates every cycle in it.
pub fn build_graph(registry: &ModuleRegistry, severities: &SeverityMap) -> ImportGraph {
    debug!("Building import graph for {} modules", registry.module_count());
    let mut graph = ImportGraph::default();
    for module in registry.modules() {
        graph.add_module(module.name());
    }

    for module in registry.modules() {
        let from = graph.nodes[module.name()];
        for (target, tags) in module.imports() {
            let Some(&to) = graph.nodes.get(target) else {
                warn!("Import of unregistered module '{}' in {}", target, module.name());
                continue;
            };
            graph.graph.add_edge(from, to, ImportEdge { tags: tags.clone(), cycle: None });
        }
    }

    let scores: Vec<(EdgeIndex, Option<Severity>)> = graph
        .graph
        .edge_references()
        .map(|e| {
            let reverse = graph.graph.find_edge(e.target(), e.source());
            let severity = reverse
                .map(|r| cycle_severity(&e.weight().tags, &graph.graph[r].tags, severities));
            (e.id(), severity)
        })
        .collect();

    let mut rated = 0;
    for (idx, severity) in scores {
        if let Some(severity) = severity {
            trace!("Edge {:?} is part of a {} cycle", graph.graph.edge_endpoints(idx), severity);
            rated += 1;
        }
        graph.graph[idx].cycle = severity;
    }

    debug!(
        "Import graph has {} modules, {} imports, {} in cycles",
        graph.module_count(),
        graph.edge_count(),
        rated
    );
    graph
}
