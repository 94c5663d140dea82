//! Generator trait.

use aotgen_core::ConfigOption;
use eyre::Result;

use super::{GenerationContext, InitFragment};

/// A pluggable analysis and emission unit.
///
/// Generators run one after another against the shared
/// [`GenerationContext`]. They may read the configuration and the analyzer
/// snapshot, record diagnostics, exclusions, build-time types and
/// side-channel values, and return code for the aggregate initializer.
///
/// A generator never sees the code emitted by another generator; only
/// context-mediated data is shared.
///
/// Returning an error aborts the whole run. Per-item problems should be
/// recorded as diagnostics instead.
///
/// # Example
///
/// ```
/// use aotgen_codegen::pipeline::{GenerationContext, Generator, InitFragment};
/// use eyre::Result;
///
/// struct Banner;
///
/// impl Generator for Banner {
///     fn id(&self) -> &str {
///         "banner"
///     }
///
///     fn generate_static_init(&self, ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
///         ctx.register_excluded_resource("banner.txt");
///         Ok(Some(InitFragment::new("print_banner").line("println!(\"ready\");")))
///     }
/// }
/// ```
pub trait Generator: Send + Sync {
    /// Unique id, also the namespace of the generator's options.
    fn id(&self) -> &str;

    /// A human-readable description of what this generator does.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Options this generator reads.
    fn options(&self) -> &[ConfigOption] {
        &[]
    }

    /// Produce code that runs once per process.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails fatally.
    fn generate_static_init(&self, ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>>;

    /// Produce code that runs once per application instance.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails fatally.
    #[allow(unused_variables)]
    fn generate_instance_init(
        &self,
        ctx: &mut GenerationContext<'_>,
    ) -> Result<Option<InitFragment>> {
        Ok(None)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn description(&self) -> Option<&str> {
        (**self).description()
    }

    fn options(&self) -> &[ConfigOption] {
        (**self).options()
    }

    fn generate_static_init(&self, ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        (**self).generate_static_init(ctx)
    }

    fn generate_instance_init(
        &self,
        ctx: &mut GenerationContext<'_>,
    ) -> Result<Option<InitFragment>> {
        (**self).generate_instance_init(ctx)
    }
}
