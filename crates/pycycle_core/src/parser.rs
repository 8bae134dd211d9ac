use log::{debug, trace};
use std::{fs, path::Path};
use tree_sitter::{Node, Parser};

use crate::{
    constants::TYPE_CHECKING_SENTINEL,
    error::{Error, Result},
    module::Module,
    types::{ExtractedImport, ImportKind, ImportStatement},
};

/// The module an import statement is written in, used to anchor relative imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingModule {
    segments: Vec<String>,
    is_package: bool,
}

impl EnclosingModule {
    pub fn new(name: &str, is_package: bool) -> Self {
        Self { segments: name.split('.').map(str::to_string).collect(), is_package }
    }

    pub fn of(module: &Module) -> Self {
        Self::new(module.name().as_str(), module.is_package())
    }

    /// Absolute module path of `from <level dots><suffix> import ...`.
    ///
    /// Inside a package initializer the first dot refers to the package itself.
    pub fn resolve_relative(&self, level: usize, suffix: Option<&str>) -> String {
        let dropped = if self.is_package { level.saturating_sub(1) } else { level };
        let keep = self.segments.len().saturating_sub(dropped);
        let mut path: Vec<&str> = self.segments[..keep].iter().map(String::as_str).collect();
        if let Some(suffix) = suffix {
            path.push(suffix);
        }
        path.join(".")
    }
}

/// Reads and parses `file`, returning its imports in source order.
pub fn imports_for(file: &Path, module: &EnclosingModule) -> Result<Vec<ExtractedImport>> {
    trace!("Parsing file for imports: {}", file.display());
    let src = fs::read_to_string(file)
        .map_err(|source| Error::Read { path: file.to_path_buf(), source })?;
    imports_from_source(&src, file, module)
}

/// Extracts and classifies every import of already loaded source text.
pub fn imports_from_source(
    src: &str,
    file: &Path,
    module: &EnclosingModule,
) -> Result<Vec<ExtractedImport>> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into())?;
    let tree = parser
        .parse(src, None)
        .ok_or_else(|| Error::Parse { path: file.to_path_buf(), line: 1, column: 1 })?;

    let root = tree.root_node();
    if root.has_error() {
        let position = first_error(root).start_position();
        return Err(Error::Parse {
            path: file.to_path_buf(),
            line: position.row + 1,
            column: position.column + 1,
        });
    }

    let mut imports: Vec<ExtractedImport> = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "import_statement" => extract_import(node, src, &mut imports),
            "import_from_statement" => extract_import_from(node, src, module, &mut imports),
            _ => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }

    debug!("Found {} imports in {}", imports.len(), file.display());
    Ok(imports)
}

// import a.b, c as d
fn extract_import(node: Node, src: &str, imports: &mut Vec<ExtractedImport>) {
    let kind = classify(node, src);
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        if let Some(module) = imported_name(name, src) {
            trace!("Found {} import: 'import {}'", kind, module);
            imports.push(ExtractedImport { statement: ImportStatement::module(module), kind });
        }
    }
}

// from a.b import c, d as e / from . import c / from a import *
fn extract_import_from(
    node: Node,
    src: &str,
    module: &EnclosingModule,
    imports: &mut Vec<ExtractedImport>,
) {
    let Some(module_node) = node.child_by_field_name("module_name") else {
        return;
    };
    let target = match module_node.kind() {
        "relative_import" => {
            let mut cursor = module_node.walk();
            let mut level = 0;
            let mut suffix = None;
            for child in module_node.named_children(&mut cursor) {
                match child.kind() {
                    "import_prefix" => level = text(child, src).matches('.').count(),
                    "dotted_name" => suffix = Some(dotted_name(child, src)),
                    _ => {}
                }
            }
            module.resolve_relative(level, suffix.as_deref())
        }
        _ => dotted_name(module_node, src),
    };

    let kind = classify(node, src);
    let mut names: Vec<String> = Vec::new();
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        names.extend(imported_name(name, src));
    }
    let mut cursor = node.walk();
    if node.named_children(&mut cursor).any(|c| c.kind() == "wildcard_import") {
        names.push("*".to_string());
    }

    for name in names {
        trace!("Found {} import: 'from {} import {}'", kind, target, name);
        imports.push(ExtractedImport {
            statement: ImportStatement::from_module(target.clone(), name),
            kind,
        });
    }
}

/// Decides how the import statement `node` is reached at runtime.
fn classify(node: Node, src: &str) -> ImportKind {
    if let Some(kind) = top_level_guard(node, src) {
        return kind;
    }
    let mut ancestor = node.parent();
    while let Some(current) = ancestor {
        if current.kind() == "function_definition" {
            return ImportKind::Dynamic;
        }
        ancestor = current.parent();
    }
    ImportKind::Vanilla
}

/// Kind of an import sitting directly in the body or `else` branch of a module-level `if`.
///
/// An `elif` is a nested `if` in Python's own syntax tree, so imports under it (and under
/// an `else` following an `elif`) are not guarded at module level.
fn top_level_guard(node: Node, src: &str) -> Option<ImportKind> {
    let block = node.parent().filter(|p| p.kind() == "block")?;
    let branch = block.parent()?;
    let if_statement = match branch.kind() {
        "if_statement" => branch,
        "else_clause" => branch.parent().filter(|p| p.kind() == "if_statement")?,
        _ => return None,
    };
    if if_statement.parent()?.kind() != "module" {
        return None;
    }
    if branch.kind() == "else_clause" {
        let mut cursor = if_statement.walk();
        if if_statement.named_children(&mut cursor).any(|c| c.kind() == "elif_clause") {
            return None;
        }
    }
    match if_statement.child_by_field_name("condition") {
        Some(condition) if is_type_checking(condition, src) => Some(ImportKind::Typing),
        _ => Some(ImportKind::Conditional),
    }
}

/// `TYPE_CHECKING` or `<anything>.TYPE_CHECKING`, possibly parenthesized.
fn is_type_checking(condition: Node, src: &str) -> bool {
    let mut expr = condition;
    while expr.kind() == "parenthesized_expression" {
        match expr.named_child(0) {
            Some(inner) => expr = inner,
            None => return false,
        }
    }
    match expr.kind() {
        "identifier" => text(expr, src) == TYPE_CHECKING_SENTINEL,
        "attribute" => expr
            .child_by_field_name("attribute")
            .is_some_and(|attr| text(attr, src) == TYPE_CHECKING_SENTINEL),
        _ => false,
    }
}

fn imported_name(node: Node, src: &str) -> Option<String> {
    match node.kind() {
        "dotted_name" => Some(dotted_name(node, src)),
        "aliased_import" => node.child_by_field_name("name").map(|n| dotted_name(n, src)),
        _ => None,
    }
}

// identifiers only, so `a . b` reads as `a.b`
fn dotted_name(node: Node, src: &str) -> String {
    let mut cursor = node.walk();
    let parts: Vec<&str> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "identifier")
        .map(|c| text(c, src))
        .collect();
    if parts.is_empty() { text(node, src).to_string() } else { parts.join(".") }
}

fn text<'a>(node: Node, src: &'a str) -> &'a str {
    src.get(node.byte_range()).unwrap_or_default()
}

fn first_error(root: Node) -> Node {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).filter(|c| c.has_error()).collect();
        stack.extend(children.into_iter().rev());
    }
    root
}
