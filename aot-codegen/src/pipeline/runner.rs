//! Pipeline driver.

use std::{collections::BTreeSet, fmt};

use aotgen_core::{Configuration, is_rust_keyword};
use aotgen_env::ApplicationSnapshot;
use eyre::{Result, WrapErr};
use tracing::{debug, info, warn};

use super::{
    CONFIGURATION_CATEGORY, FragmentKind, FragmentRecord, GenerationContext, GenerationOutput,
    Generator, GeneratorRegistry, INITIALIZER_FILE, InitFragment, PipelineError,
    fragment::APPLICATION_BUILDER,
    options::{self, DRIVER_OPTIONS, STRICT_CLASSPATH},
};
use crate::builder::{CodeBuilder, CodeFragment, ImportCollector, Renderable};

/// Names of the public entry points of the initializer.
const ENTRY_POINTS: [&str; 2] = ["static_init", "instance_init"];

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Created,
    ContextBuilt,
    GeneratorsRunning,
    Assembled,
    Done,
}

impl PipelineState {
    /// The state following this one. `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            PipelineState::Created => PipelineState::ContextBuilt,
            PipelineState::ContextBuilt => PipelineState::GeneratorsRunning,
            PipelineState::GeneratorsRunning => PipelineState::Assembled,
            PipelineState::Assembled | PipelineState::Done => PipelineState::Done,
        }
    }

    fn advance(&mut self) {
        let next = self.next();
        info!(from = %self, to = %next, "pipeline state");
        *self = next;
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Created => "created",
            PipelineState::ContextBuilt => "context-built",
            PipelineState::GeneratorsRunning => "generators-running",
            PipelineState::Assembled => "assembled",
            PipelineState::Done => "done",
        };
        f.write_str(name)
    }
}

/// The generation pipeline driver.
///
/// The driver selects generators from its registry, builds the single
/// [`GenerationContext`] of the run, invokes every generator in order and
/// assembles the [`GenerationOutput`]. Any generator error aborts the run and
/// no output is produced.
///
/// # Example
///
/// ```
/// use aotgen_codegen::pipeline::{GeneratorRegistry, Pipeline};
/// use aotgen_core::{Configuration, Runtime};
/// use aotgen_env::{ApplicationSnapshot, TypeIndex};
///
/// let snapshot = ApplicationSnapshot::new().with_types(TypeIndex::new().with_type("a::Known", "deps/a"));
/// let config = Configuration::new(Runtime::Jit)
///     .with("known.missing.types.list", "a::Known,b::Missing");
///
/// let output = Pipeline::new(GeneratorRegistry::builtin())
///     .package("my_app::aot")
///     .order(["known.missing.types"])
///     .run(&config, &snapshot)
///     .unwrap();
///
/// assert!(output.initializer().content().contains("known_missing_types.insert(\"b::Missing\");"));
/// assert!(!output.initializer().content().contains("\"a::Known\""));
/// ```
pub struct Pipeline {
    registry: GeneratorRegistry,
    package: Option<String>,
    order: Option<Vec<String>>,
    generators: Vec<Box<dyn Generator>>,
}

/// A fragment together with the generator and slot it belongs to.
struct Emitted {
    generator: String,
    kind: FragmentKind,
    fragment: InitFragment,
}

impl Pipeline {
    /// Create a pipeline drawing generators from `registry`.
    pub fn new(registry: GeneratorRegistry) -> Self {
        Self {
            registry,
            package: None,
            order: None,
            generators: Vec::new(),
        }
    }

    /// Set the package generated code is qualified under.
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Run exactly these registered generators, in this order.
    pub fn order(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.order = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Add a generator to run after the selected ones.
    pub fn generator(mut self, generator: impl Generator + 'static) -> Self {
        self.generators.push(Box::new(generator));
        self
    }

    /// Run the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if generator selection fails, if any generator fails,
    /// if a fragment cannot be placed in the initializer, or if strict
    /// classpath checking finds an unresolvable type.
    pub fn run(
        &self,
        configuration: &Configuration,
        snapshot: &ApplicationSnapshot,
    ) -> Result<GenerationOutput> {
        let mut state = PipelineState::Created;

        let package = self.package.as_deref().ok_or(PipelineError::MissingPackage)?;
        if package
            .split("::")
            .any(|segment| !is_identifier(segment) || is_rust_keyword(segment))
        {
            return Err(PipelineError::InvalidPackage {
                package: package.to_string(),
            }
            .into());
        }

        let selected = self.registry.select(configuration, self.order.as_deref())?;
        let generators: Vec<&dyn Generator> = selected
            .iter()
            .chain(&self.generators)
            .map(|generator| generator.as_ref())
            .collect();

        let mut ids = BTreeSet::new();
        for generator in &generators {
            if !ids.insert(generator.id()) {
                return Err(PipelineError::DuplicateGenerator {
                    id: generator.id().to_string(),
                }
                .into());
            }
        }

        let effective = configuration.with_defaults(
            DRIVER_OPTIONS
                .iter()
                .chain(generators.iter().flat_map(|&generator| generator.options())),
        );
        let mut ctx = GenerationContext::new(package, effective, snapshot);
        state.advance();

        validate_options(&mut ctx, &generators);

        state.advance();
        let mut emitted = Vec::new();
        let mut names: BTreeSet<String> = ENTRY_POINTS.iter().map(|s| s.to_string()).collect();
        for generator in &generators {
            let id = generator.id();
            info!(generator = id, "running generator");

            let static_init = generator
                .generate_static_init(&mut ctx)
                .wrap_err_with(|| format!("generator '{}' failed in static init", id))?;
            let instance_init = generator
                .generate_instance_init(&mut ctx)
                .wrap_err_with(|| format!("generator '{}' failed in instance init", id))?;

            for (kind, fragment) in [
                (FragmentKind::Static, static_init),
                (FragmentKind::Instance, instance_init),
            ] {
                let Some(fragment) = fragment else { continue };
                check_fragment_name(fragment.name(), &mut names)
                    .wrap_err_with(|| format!("generator '{}' emitted an invalid fragment", id))?;
                debug!(generator = id, %kind, name = fragment.name(), "fragment emitted");
                emitted.push(Emitted {
                    generator: id.to_string(),
                    kind,
                    fragment,
                });
            }
        }

        let strict = ctx.configuration().boolean(STRICT_CLASSPATH.key(), false)?;
        for handle in ctx.unresolved_build_classes() {
            if strict {
                return Err(PipelineError::UnresolvedBuildClass {
                    name: handle.name().to_string(),
                    artifact: handle.artifact().map(Into::into),
                }
                .into());
            }
            debug!(name = handle.name(), "dropping type without classpath location");
        }

        state.advance();
        let initializer = Initializer {
            runtime_crate: ctx.runtime_crate(),
            fragments: &emitted,
        };
        let mut builder = CodeBuilder::rust();
        builder.emit(&initializer);
        let initializer = ctx.source_file(INITIALIZER_FILE, builder.build());

        let runtime = ctx.runtime();
        let (excluded_resources, diagnostics, extra_build_classpath) = ctx.into_parts();
        let output = GenerationOutput {
            package: package.to_string(),
            runtime,
            initializer,
            fragments: emitted
                .iter()
                .map(|e| FragmentRecord {
                    generator: e.generator.clone(),
                    kind: e.kind,
                    name: e.fragment.name().to_string(),
                })
                .collect(),
            excluded_resources: excluded_resources.into_iter().collect(),
            extra_build_classpath,
            diagnostics,
            generators: generators.iter().map(|g| g.id().to_string()).collect(),
        };

        state.advance();
        debug_assert_eq!(state, PipelineState::Done);
        Ok(output)
    }
}

/// Record configured keys that no active generator declares.
///
/// A key is checked against the longest active namespace it falls under, so
/// `known.missing.types.list` belongs to `known.missing.types` even when a
/// generator with id `known` is also active.
fn validate_options(ctx: &mut GenerationContext<'_>, generators: &[&dyn Generator]) {
    let namespaces: Vec<_> = generators
        .iter()
        .map(|generator| (generator.id(), generator.options()))
        .chain(std::iter::once((options::NAMESPACE, DRIVER_OPTIONS)))
        .collect();

    let mut unknown = Vec::new();
    for &(namespace, declared) in &namespaces {
        let prefix = format!("{}.", namespace);
        let enabled = format!("{}.enabled", namespace);
        for key in ctx.configuration().keys_with_prefix(&prefix) {
            let owned_by_longer = namespaces.iter().any(|&(other, _)| {
                other.len() > namespace.len() && key.starts_with(&format!("{}.", other))
            });
            if owned_by_longer {
                continue;
            }
            if key != enabled && !declared.iter().any(|option| option.key() == key) {
                unknown.push(format!("unknown option '{}' for '{}'", key, namespace));
            }
        }
    }

    for message in unknown {
        warn!("{}", message);
        ctx.add_diagnostic(CONFIGURATION_CATEGORY, message);
    }
}

fn check_fragment_name(name: &str, taken: &mut BTreeSet<String>) -> Result<()> {
    if !is_identifier(name) {
        return Err(PipelineError::InvalidFragmentName {
            name: name.to_string(),
        }
        .into());
    }
    if !taken.insert(name.to_string()) {
        return Err(PipelineError::DuplicateFragment {
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The aggregate initializer file.
struct Initializer<'a> {
    runtime_crate: &'a str,
    fragments: &'a [Emitted],
}

impl Initializer<'_> {
    fn of_kind(&self, kind: FragmentKind) -> impl Iterator<Item = &Emitted> {
        self.fragments.iter().filter(move |e| e.kind == kind)
    }

    fn calls(&self, kind: FragmentKind) -> Vec<CodeFragment> {
        self.of_kind(kind)
            .map(|e| CodeFragment::line(e.fragment.function(kind).call()))
            .collect()
    }
}

impl Renderable for Initializer<'_> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut imports = ImportCollector::new();
        imports.add_path("std::sync::Once");
        imports.add(self.runtime_crate, APPLICATION_BUILDER);
        for emitted in self.fragments {
            for path in emitted.fragment.imports() {
                imports.add_path(path);
            }
        }

        let mut fragments = vec![
            CodeFragment::line("//! Generated by aotgen. Do not edit."),
            CodeFragment::blank(),
        ];
        fragments.extend(imports.to_fragments());
        fragments.push(CodeFragment::blank());

        fragments.push(CodeFragment::doc(
            "Runs every static initializer, once per process.",
        ));
        fragments.push(CodeFragment::block(
            "pub fn static_init() {",
            vec![
                CodeFragment::line("static INIT: Once = Once::new();"),
                CodeFragment::block(
                    "INIT.call_once(|| {",
                    self.calls(FragmentKind::Static),
                    "});",
                ),
            ],
            "}",
        ));
        fragments.push(CodeFragment::blank());

        let instance_calls = self.calls(FragmentKind::Instance);
        let parameter = if instance_calls.is_empty() {
            "_builder"
        } else {
            "builder"
        };
        fragments.push(CodeFragment::doc(
            "Runs every instance initializer against a new application.",
        ));
        fragments.push(CodeFragment::block(
            format!(
                "pub fn instance_init({}: &mut {}) {{",
                parameter, APPLICATION_BUILDER
            ),
            instance_calls,
            "}",
        ));

        for emitted in self.fragments {
            fragments.push(CodeFragment::blank());
            fragments.extend(emitted.fragment.function(emitted.kind).to_fragments());
        }
        fragments
    }
}
