//! Component preloading.

use aotgen_core::Runtime;
use aotgen_env::Resolution;
use eyre::Result;
use tracing::debug;

use super::{InlinedProperties, describe_miss};
use crate::pipeline::{GenerationContext, Generator, InitFragment, string_literal};

const ID: &str = "components.eager";

/// Preloads declared components when an application instance is built.
///
/// Under [`Runtime::Jit`] only components flagged eager are preloaded; under
/// [`Runtime::Native`] every component is. Components switched off with
/// `<name>.enabled=false` in the properties inlined by `resources.inline` are
/// skipped, so that generator must run first for the switch to apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct EagerComponentsGenerator;

impl Generator for EagerComponentsGenerator {
    fn id(&self) -> &str {
        ID
    }

    fn description(&self) -> Option<&str> {
        Some("Preloads declared components when the application is built")
    }

    fn generate_static_init(&self, _ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        Ok(None)
    }

    fn generate_instance_init(
        &self,
        ctx: &mut GenerationContext<'_>,
    ) -> Result<Option<InitFragment>> {
        let analyzer = ctx.analyzer();
        let runtime = ctx.runtime();
        let mut preloads = Vec::new();

        for component in &analyzer.components {
            if runtime == Runtime::Jit && !component.eager {
                continue;
            }
            if ctx
                .get::<InlinedProperties>()
                .is_some_and(|props| props.is_disabled(&component.name))
            {
                debug!(component = %component.name, "component disabled by properties");
                continue;
            }

            match analyzer.resolver().resolve(&component.type_name) {
                Resolution::Found(handle) => {
                    ctx.register_class_needed_at_build_time(handle);
                    preloads.push(format!(
                        "builder.preload({}, {});",
                        string_literal(&component.name),
                        string_literal(&component.type_name)
                    ));
                }
                miss => {
                    ctx.add_diagnostic(
                        ID,
                        format!(
                            "component '{}' skipped, {}",
                            component.name,
                            describe_miss(&component.type_name, &miss)
                        ),
                    );
                }
            }
        }

        Ok(Some(
            InitFragment::new("preload_components")
                .doc("Preloads components before the application starts.")
                .lines(preloads),
        ))
    }
}

#[cfg(test)]
mod tests {
    use aotgen_core::Configuration;
    use aotgen_env::{ApplicationSnapshot, ComponentInfo, TypeIndex};

    use super::*;
    use crate::builder::CodeFragment;

    fn snapshot() -> ApplicationSnapshot {
        ApplicationSnapshot::new()
            .with_types(
                TypeIndex::new()
                    .with_type("app::Database", "deps/db")
                    .with_type("app::Cache", "deps/cache"),
            )
            .with_component(ComponentInfo::new("db", "app::Database").eager())
            .with_component(ComponentInfo::new("cache", "app::Cache"))
            .with_component(ComponentInfo::new("mailer", "app::Mailer").eager())
    }

    fn preloads(
        runtime: Runtime,
        setup: impl FnOnce(&mut GenerationContext<'_>),
    ) -> (Vec<CodeFragment>, Vec<String>) {
        let snapshot = snapshot();
        let mut ctx = GenerationContext::new("app", Configuration::new(runtime), &snapshot);
        setup(&mut ctx);
        let fragment = EagerComponentsGenerator
            .generate_instance_init(&mut ctx)
            .unwrap()
            .unwrap();
        let names = ctx
            .build_classes()
            .iter()
            .map(|h| h.name().to_string())
            .collect();
        (fragment.body().to_vec(), names)
    }

    #[test]
    fn test_jit_preloads_eager_only() {
        let (body, classes) = preloads(Runtime::Jit, |_| {});
        assert_eq!(
            body,
            vec![CodeFragment::line("builder.preload(\"db\", \"app::Database\");")]
        );
        assert_eq!(classes, vec!["app::Database"]);
    }

    #[test]
    fn test_native_preloads_all() {
        let (body, classes) = preloads(Runtime::Native, |_| {});
        assert_eq!(body.len(), 2);
        assert_eq!(classes, vec!["app::Cache", "app::Database"]);
    }

    #[test]
    fn test_disabled_by_inlined_properties() {
        let (body, classes) = preloads(Runtime::Native, |ctx| {
            let mut props = InlinedProperties::new();
            props.insert("db.enabled", "FALSE");
            ctx.put(props);
        });
        assert_eq!(
            body,
            vec![CodeFragment::line("builder.preload(\"cache\", \"app::Cache\");")]
        );
        assert_eq!(classes, vec!["app::Cache"]);
    }

    #[test]
    fn test_missing_type_is_diagnostic() {
        let snapshot = snapshot();
        let mut ctx = GenerationContext::new("app", Configuration::new(Runtime::Jit), &snapshot);
        EagerComponentsGenerator
            .generate_instance_init(&mut ctx)
            .unwrap();

        assert_eq!(
            ctx.diagnostics().get(ID),
            ["component 'mailer' skipped, app::Mailer: not found"]
        );
    }

    #[test]
    fn test_no_static_fragment() {
        let snapshot = snapshot();
        let mut ctx = GenerationContext::new("app", Configuration::new(Runtime::Jit), &snapshot);
        assert!(
            EagerComponentsGenerator
                .generate_static_init(&mut ctx)
                .unwrap()
                .is_none()
        );
    }
}
