//! Generation context shared by every generator of a run.

use std::{
    any::Any,
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use aotgen_core::{Configuration, Runtime};
use aotgen_env::{ApplicationSnapshot, TypeHandle};
use indexmap::IndexSet;

use super::{Diagnostics, Extensions, SourceFile, options};

/// The mutable aggregation point of a generation run.
///
/// Exactly one context exists per run. The driver creates it, passes it to
/// every generator in order, and reads it back once all generators are done.
/// Every mutation is bookkeeping and cannot fail.
///
/// # Example
///
/// ```
/// use aotgen_codegen::pipeline::GenerationContext;
/// use aotgen_core::{Configuration, Runtime};
/// use aotgen_env::ApplicationSnapshot;
///
/// let snapshot = ApplicationSnapshot::new();
/// let mut ctx = GenerationContext::new("my_app::aot", Configuration::new(Runtime::Jit), &snapshot);
///
/// ctx.register_excluded_resource("application.properties");
/// ctx.register_excluded_resource("application.properties");
/// ctx.add_diagnostic("known.missing.types", "b::Missing: not found");
///
/// assert_eq!(ctx.excluded_resources().len(), 1);
/// assert_eq!(ctx.diagnostics().get("known.missing.types").len(), 1);
/// ```
#[derive(Debug)]
pub struct GenerationContext<'a> {
    package_name: String,
    configuration: Configuration,
    analyzer: &'a ApplicationSnapshot,
    excluded_resources: BTreeSet<String>,
    diagnostics: Diagnostics,
    build_classes: BTreeSet<TypeHandle>,
    extensions: Extensions,
}

impl<'a> GenerationContext<'a> {
    /// Create the context for a run.
    pub fn new(
        package_name: impl Into<String>,
        configuration: Configuration,
        analyzer: &'a ApplicationSnapshot,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            configuration,
            analyzer,
            excluded_resources: BTreeSet::new(),
            diagnostics: Diagnostics::new(),
            build_classes: BTreeSet::new(),
            extensions: Extensions::new(),
        }
    }

    /// Module path generated code is qualified under.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The runtime this run targets.
    pub fn runtime(&self) -> Runtime {
        self.configuration.runtime()
    }

    /// Run parameters, with option defaults applied.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Precomputed facts about the application.
    pub fn analyzer(&self) -> &'a ApplicationSnapshot {
        self.analyzer
    }

    /// Crate path generated code uses for runtime optimization slots.
    pub fn runtime_crate(&self) -> &str {
        self.configuration
            .string(options::RUNTIME_CRATE.key())
            .unwrap_or(options::RUNTIME_CRATE.default_value())
    }

    /// Mark a resource as subsumed by generated code so packaging drops it.
    pub fn register_excluded_resource(&mut self, path: impl Into<String>) {
        self.excluded_resources.insert(path.into());
    }

    /// Record that generated code references `handle` and its artifact must be
    /// on the build classpath.
    pub fn register_class_needed_at_build_time(&mut self, handle: TypeHandle) {
        self.build_classes.insert(handle);
    }

    /// Append a diagnostic message to a category.
    pub fn add_diagnostic(&mut self, category: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.add(category, message);
    }

    /// Store a side-channel value. The last write for a type wins.
    pub fn put<T: Any + Send + Sync>(&mut self, value: T) {
        self.extensions.put(value);
    }

    /// Read a side-channel value written by this or an earlier generator.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    /// Mutable access to a side-channel value.
    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.extensions.get_mut::<T>()
    }

    /// Excluded resources in sorted order.
    pub fn excluded_resources(&self) -> &BTreeSet<String> {
        &self.excluded_resources
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Types registered as needed at build time, in name order.
    pub fn build_classes(&self) -> &BTreeSet<TypeHandle> {
        &self.build_classes
    }

    /// Locations to add to the build classpath.
    ///
    /// Each registered type is mapped to its artifact. Types without a
    /// location that exists on disk are left out, and each location appears
    /// once, in the order of the first type that mapped to it.
    pub fn extra_build_classpath(&self) -> Vec<PathBuf> {
        let locations: IndexSet<&Path> = self
            .build_classes
            .iter()
            .filter_map(TypeHandle::location)
            .collect();
        locations.into_iter().map(Path::to_path_buf).collect()
    }

    /// Registered types whose artifact cannot be resolved to a location.
    pub fn unresolved_build_classes(&self) -> impl Iterator<Item = &TypeHandle> {
        self.build_classes
            .iter()
            .filter(|handle| handle.location().is_none())
    }

    /// Directory of the package, relative to the output root.
    ///
    /// `my_app::aot` becomes `my_app/aot`.
    pub fn package_path(&self) -> PathBuf {
        package_path(&self.package_name)
    }

    /// A source file qualified under the package directory.
    pub fn source_file(&self, file_name: &str, content: impl Into<String>) -> SourceFile {
        SourceFile::new(self.package_path().join(file_name), content)
    }

    pub(crate) fn into_parts(self) -> (BTreeSet<String>, Diagnostics, Vec<PathBuf>) {
        let classpath = self.extra_build_classpath();
        (self.excluded_resources, self.diagnostics, classpath)
    }
}

pub(crate) fn package_path(package: &str) -> PathBuf {
    package.split("::").collect()
}
