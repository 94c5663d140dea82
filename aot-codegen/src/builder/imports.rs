//! Import collection for generated files.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::CodeFragment;

/// Tracks `use` declarations and deduplicates them.
///
/// Modules keep insertion order and symbols are sorted, so the rendered
/// header is deterministic.
///
/// # Example
///
/// ```
/// use aotgen_codegen::builder::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add_path("std::collections::HashSet");
/// imports.add_path("aotgen_runtime::StaticOptimizations");
/// imports.add_path("aotgen_runtime::KnownMissingTypes");
///
/// let lines: Vec<_> = imports.render_lines().collect();
/// assert_eq!(
///     lines,
///     vec![
///         "use std::collections::HashSet;",
///         "use aotgen_runtime::{KnownMissingTypes, StaticOptimizations};",
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    /// Module path -> set of symbols (sorted for deterministic output)
    imports: IndexMap<String, BTreeSet<String>>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol import from a module.
    pub fn add(&mut self, module: &str, symbol: &str) {
        self.imports
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    /// Add a full path such as `std::sync::Once`.
    ///
    /// A path without `::` imports a crate or module by itself.
    pub fn add_path(&mut self, path: &str) {
        match path.rsplit_once("::") {
            Some((module, symbol)) => self.add(module, symbol),
            None => {
                self.imports.entry(path.to_string()).or_default();
            }
        }
    }

    /// Check if a specific symbol is imported from a module.
    pub fn has_symbol(&self, module: &str, symbol: &str) -> bool {
        self.imports
            .get(module)
            .is_some_and(|symbols| symbols.contains(symbol))
    }

    /// Check if the collector is empty.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Render one `use` line per module.
    pub fn render_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.imports.iter().map(|(module, symbols)| {
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            match symbols.as_slice() {
                [] => format!("use {};", module),
                [one] => format!("use {}::{};", module, one),
                many => format!("use {}::{{{}}};", module, many.join(", ")),
            }
        })
    }

    /// Render the imports as line fragments.
    pub fn to_fragments(&self) -> Vec<CodeFragment> {
        self.render_lines().map(CodeFragment::Line).collect()
    }
}
