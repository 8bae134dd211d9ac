use log::{debug, info, trace};
use rayon::prelude::*;
use std::path::PathBuf;

use crate::{
    collector::CollectorConfig,
    error::Result,
    module::ModuleName,
    parser::{EnclosingModule, imports_for},
    registry::ModuleRegistry,
    resolver::attach,
    types::ExtractedImport,
};

/// Builds the complete module tree of a package, with all first-party imports attached.
///
/// Every module is registered before any import is resolved, since a file may import
/// a module that is only found later in the walk. Files are parsed in parallel, the
/// results are attached by this thread alone. Any read or parse failure aborts the
/// whole build.
pub fn parse_project(cfg: &CollectorConfig) -> Result<ModuleRegistry> {
    info!("Building module tree for {}", cfg.root.path.display());
    let mut registry = ModuleRegistry::populate(cfg)?;

    let sources: Vec<(ModuleName, PathBuf, EnclosingModule)> = registry
        .modules()
        .filter_map(|m| {
            m.source().map(|s| (m.name().clone(), s.to_path_buf(), EnclosingModule::of(m)))
        })
        .collect();
    info!("Parsing {} source files", sources.len());

    let extracted: Vec<(ModuleName, Vec<ExtractedImport>)> = sources
        .par_iter()
        .map(|(name, path, module)| {
            imports_for(path, module).map(|imports| (name.clone(), imports))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut attached = 0;
    for (owner, imports) in extracted {
        for import in imports {
            if registry.longest_prefix(&import.statement.module).is_none() {
                trace!("Skipping non-first-party import '{}' in {}", import.statement, owner);
                continue;
            }
            attach(&mut registry, &owner, &import.statement, import.kind)?;
            attached += 1;
        }
    }

    debug!("Attached {} first-party imports to {} modules", attached, registry.module_count());
    Ok(registry)
}
