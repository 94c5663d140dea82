//! Existence probes resolved at build time.

use aotgen_core::ConfigOption;
use aotgen_env::TypeResolver;
use eyre::Result;
use tracing::debug;

use super::describe_miss;
use crate::pipeline::{GenerationContext, Generator, InitFragment, string_literal};

const ID: &str = "known.missing.types";

const LIST: ConfigOption = ConfigOption::new(
    "known.missing.types.list",
    "Types to check for existence at build time (comma separated)",
    "inject::Inject,app::SomeType",
);

const OPTIONS: &[ConfigOption] = &[LIST];

/// Probes a configured list of types and installs the missing ones into a
/// runtime optimization slot, so the running process never repeats the probe.
///
/// Each name is probed on its own. A name that fails to resolve, because it
/// does not exist or because one of its dependencies does not, lands in the
/// emitted set and in the diagnostics. A name that resolves is left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownMissingTypesGenerator;

impl KnownMissingTypesGenerator {
    fn find_missing(
        resolver: &dyn TypeResolver,
        names: &[String],
        ctx: &mut GenerationContext<'_>,
    ) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            let resolution = resolver.resolve(name);
            debug!(name = %name, missing = resolution.is_missing(), "probed type");
            if resolution.is_missing() && !missing.contains(name) {
                ctx.add_diagnostic(ID, describe_miss(name, &resolution));
                missing.push(name.clone());
            }
        }
        missing
    }
}

impl Generator for KnownMissingTypesGenerator {
    fn id(&self) -> &str {
        ID
    }

    fn description(&self) -> Option<&str> {
        Some("Checks the existence of types at build time instead of at runtime")
    }

    fn options(&self) -> &[ConfigOption] {
        OPTIONS
    }

    fn generate_static_init(&self, ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        let names = ctx.configuration().string_list(LIST.key());
        let resolver = ctx.analyzer().resolver();
        let missing = Self::find_missing(resolver, &names, ctx);

        let runtime = ctx.runtime_crate().to_string();
        let binding = if missing.is_empty() { "let" } else { "let mut" };
        let fragment = InitFragment::new("prepare_known_missing_types")
            .doc("Installs the types known to be missing from the build environment.")
            .uses("std::collections::HashSet")
            .uses(format!("{}::StaticOptimizations", runtime))
            .uses(format!("{}::KnownMissingTypes", runtime))
            .line(format!(
                "{} known_missing_types: HashSet<&'static str> = HashSet::new();",
                binding
            ))
            .lines(missing.iter().map(|name| {
                format!("known_missing_types.insert({});", string_literal(name))
            }))
            .line("StaticOptimizations::set(KnownMissingTypes::new(known_missing_types));");

        Ok(Some(fragment))
    }
}
