use anyhow::{Context, Result};
use log::{debug, info};
use pycycle_core::{CollectorConfig, parse_project};

use crate::{config::Config, export::export, graph::build_graph, types::CheckResult};

/// Parses the package, builds its import graph and rates every import cycle in it.
///
/// Fails without partial results if the root is unusable or any file cannot be read
/// or parsed.
pub fn run_import_cycle_check(mut cfg: Config) -> Result<CheckResult> {
    info!("Starting import cycle check");
    cfg.initialize()?;
    let project = cfg.project()?.clone();
    info!("Analyzing package '{}' at {}", project.name, project.path.display());

    let collector_cfg =
        CollectorConfig { root: project.clone(), respect_gitignore: cfg.respect_gitignore };
    let registry = parse_project(&collector_cfg)
        .with_context(|| format!("Failed to analyze package '{}'", project.name))?;
    info!("Found {} modules", registry.module_count());

    let severities = cfg.severity_map();
    debug!("Using severities: {:?}", severities);
    let graph = build_graph(&registry, &severities);
    let cycles = graph.cycles();
    info!("Found {} import cycles", cycles.len());

    Ok(CheckResult {
        package: project.name,
        graph: export(&graph, cfg.only_cycles),
        cycles,
        modules_analyzed: registry.module_count(),
    })
}
