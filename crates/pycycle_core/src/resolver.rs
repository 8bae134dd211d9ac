use log::trace;

use crate::{
    error::{Error, Result},
    module::ModuleName,
    registry::ModuleRegistry,
    types::{ImportKind, ImportStatement},
};

/// Finds the module an import refers to.
///
/// `import a.b.c` resolves to the longest registered prefix of `a.b.c`. For
/// `from a.b import c` there is no way to tell statically whether `c` is a submodule
/// or an attribute of `a.b`, so `a.b.c` is tried first and `a.b` is the fallback.
///
/// Fails if not even the first segment of the module is known, which means a
/// non-first-party import slipped through.
pub fn resolve(
    registry: &ModuleRegistry,
    owner: &ModuleName,
    import: &ImportStatement,
) -> Result<ModuleName> {
    let target = registry.longest_prefix(&import.module).ok_or_else(|| Error::Resolution {
        owner: owner.clone(),
        target: import.module.clone(),
    })?;
    if target.name() != import.module.as_str() {
        trace!("'{}' resolved to its longest known prefix '{}'", import.module, target.name());
    }

    if let Some(name) = &import.name {
        let candidate = format!("{}.{}", import.module, name);
        if let Some(submodule) = target.child(&candidate) {
            return Ok(submodule.name().clone());
        }
        trace!("'{}' is not a module, keeping '{}'", candidate, target.name());
    }
    Ok(target.name().clone())
}

/// Resolves `import` and merges it with `kind` into the imports of `owner`.
pub fn attach(
    registry: &mut ModuleRegistry,
    owner: &ModuleName,
    import: &ImportStatement,
    kind: ImportKind,
) -> Result<()> {
    let target = resolve(registry, owner, import)?;
    trace!("Attaching {} -> {} ({})", owner, target, kind);
    registry
        .get_mut(owner.as_str())
        .ok_or_else(|| Error::MissingModule(owner.clone()))?
        .add_import(target, kind);
    Ok(())
}
