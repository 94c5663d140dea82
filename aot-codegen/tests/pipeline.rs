//! End-to-end tests for the generation pipeline.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use std::{
    fs,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use aotgen_codegen::{
    GenerationContext, Generator, GeneratorRegistry, InitFragment, Pipeline,
    pipeline::{CONFIGURATION_CATEGORY, PipelineError},
};
use aotgen_core::{Configuration, Runtime};
use aotgen_env::{ApplicationSnapshot, ComponentInfo, TypeHandle, TypeIndex};
use eyre::{Result, eyre};
use tempfile::TempDir;

const ALL: [&str; 3] = ["resources.inline", "known.missing.types", "components.eager"];

fn snapshot() -> ApplicationSnapshot {
    ApplicationSnapshot::new()
        .with_types(
            TypeIndex::new()
                .with_type("aotgen_runtime::PropertySource", "deps/rt")
                .with_type("app::Database", "deps/db")
                .with_type("a::Known", "deps/a"),
        )
        .with_component(ComponentInfo::new("db", "app::Database").eager())
        .with_component(ComponentInfo::new("cache", "app::Cache"))
        .with_resource("application.properties", "cache.enabled=false\nname=demo\n")
}

fn configuration() -> Configuration {
    Configuration::new(Runtime::Native).with("known.missing.types.list", "a::Known,b::Missing")
}

fn pipeline(order: &[&str]) -> Pipeline {
    Pipeline::new(GeneratorRegistry::builtin())
        .package("my_app::aot")
        .order(order.iter().copied())
}

/// A generator that always fails.
struct Failing;

impl Generator for Failing {
    fn id(&self) -> &str {
        "failing"
    }

    fn generate_static_init(&self, ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        ctx.register_excluded_resource("should-not-leak.txt");
        Err(eyre!("analysis exploded"))
    }
}

/// Emits a static fragment, then fails in instance init.
struct FailingInstance;

impl Generator for FailingInstance {
    fn id(&self) -> &str {
        "failing.instance"
    }

    fn generate_static_init(&self, _ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        Ok(Some(InitFragment::new("warm_up").line("let _ = 1;")))
    }

    fn generate_instance_init(
        &self,
        _ctx: &mut GenerationContext<'_>,
    ) -> Result<Option<InitFragment>> {
        Err(eyre!("instance wiring exploded"))
    }
}

/// Fails in static init and records whether instance init was reached.
struct FailingStatic {
    instance_called: Arc<AtomicBool>,
}

impl Generator for FailingStatic {
    fn id(&self) -> &str {
        "failing.static"
    }

    fn generate_static_init(&self, _ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        Err(eyre!("static analysis exploded"))
    }

    fn generate_instance_init(
        &self,
        _ctx: &mut GenerationContext<'_>,
    ) -> Result<Option<InitFragment>> {
        self.instance_called.store(true, Ordering::SeqCst);
        Ok(None)
    }
}

/// A generator whose id is a prefix of the built-in `known.missing.types`.
struct Known;

impl Generator for Known {
    fn id(&self) -> &str {
        "known"
    }

    fn generate_static_init(&self, _ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        Ok(None)
    }
}

/// Registers a synthetic type, which never has a classpath location.
struct Synthetic;

impl Generator for Synthetic {
    fn id(&self) -> &str {
        "synthetic"
    }

    fn generate_static_init(&self, ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        ctx.register_class_needed_at_build_time(TypeHandle::synthetic("app::Proxy"));
        Ok(None)
    }
}

#[test]
fn test_builtin_initializer() {
    let output = pipeline(&ALL).run(&configuration(), &snapshot()).unwrap();
    insta::assert_snapshot!("builtin_initializer", output.initializer().content());
}

#[test]
fn test_output_is_deterministic() {
    let first = pipeline(&ALL).run(&configuration(), &snapshot()).unwrap();
    let second = pipeline(&ALL).run(&configuration(), &snapshot()).unwrap();

    assert_eq!(first.initializer(), second.initializer());
    assert_eq!(first.render_report().unwrap(), second.render_report().unwrap());

    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    first.write_to(dir_a.path()).unwrap();
    second.write_to(dir_b.path()).unwrap();
    for (relative, _) in first.files().unwrap() {
        assert_eq!(
            fs::read(dir_a.path().join(&relative)).unwrap(),
            fs::read(dir_b.path().join(&relative)).unwrap(),
            "{} differs",
            relative.display()
        );
    }
}

#[test]
fn test_output_contents() {
    let output = pipeline(&ALL).run(&configuration(), &snapshot()).unwrap();

    assert_eq!(output.generators(), ALL);
    assert_eq!(output.excluded_resources(), ["application.properties"]);
    assert_eq!(
        output.diagnostics().get("known.missing.types"),
        ["b::Missing: not found"]
    );
    // Artifacts under deps/ do not exist, so nothing reaches the classpath
    assert!(output.extra_build_classpath().is_empty());

    let names: Vec<_> = output.fragments().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "seed_inlined_properties",
            "prepare_known_missing_types",
            "preload_components"
        ]
    );
}

#[test]
fn test_failing_generator_aborts_without_artifacts() {
    let out = TempDir::new().unwrap();

    let result = Pipeline::new(GeneratorRegistry::builtin())
        .package("my_app::aot")
        .order(["known.missing.types"])
        .generator(Failing)
        .run(&configuration(), &snapshot())
        .and_then(|output| output.write_to(out.path()));

    let err = result.unwrap_err();
    assert!(err.to_string().contains("generator 'failing'"));
    assert_eq!(err.root_cause().to_string(), "analysis exploded");
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_instance_init_failure_aborts_without_artifacts() {
    let out = TempDir::new().unwrap();

    let result = Pipeline::new(GeneratorRegistry::new())
        .package("my_app::aot")
        .generator(FailingInstance)
        .run(&configuration(), &snapshot())
        .and_then(|output| output.write_to(out.path()));

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "generator 'failing.instance' failed in instance init"
    );
    assert_eq!(err.root_cause().to_string(), "instance wiring exploded");
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_static_init_failure_skips_instance_init() {
    let instance_called = Arc::new(AtomicBool::new(false));

    let err = Pipeline::new(GeneratorRegistry::new())
        .package("my_app::aot")
        .generator(FailingStatic {
            instance_called: Arc::clone(&instance_called),
        })
        .run(&configuration(), &snapshot())
        .unwrap_err();

    assert_eq!(err.to_string(), "generator 'failing.static' failed in static init");
    assert!(!instance_called.load(Ordering::SeqCst));
}

#[test]
fn test_side_channel_follows_run_order() {
    // resources.inline first: the component switch is visible
    let inline_first = pipeline(&["resources.inline", "components.eager"])
        .run(&configuration(), &snapshot())
        .unwrap();
    assert!(!inline_first.initializer().content().contains("\"cache\""));

    // components.eager first: nothing was inlined yet, so cache is preloaded
    // and its type is reported missing
    let eager_first = pipeline(&["components.eager", "resources.inline"])
        .run(&configuration(), &snapshot())
        .unwrap();
    assert_eq!(
        eager_first.diagnostics().get("components.eager"),
        ["component 'cache' skipped, app::Cache: not found"]
    );
}

#[test]
fn test_enabled_switches_select_generators() {
    let config = configuration()
        .with("known.missing.types.enabled", "true")
        .with("components.eager.enabled", "true");

    let output = Pipeline::new(GeneratorRegistry::builtin())
        .package("my_app::aot")
        .run(&config, &snapshot())
        .unwrap();

    assert_eq!(output.generators(), ["known.missing.types", "components.eager"]);
    assert!(output.excluded_resources().is_empty());
}

#[test]
fn test_unknown_generator_is_fatal() {
    let err = pipeline(&["resources.inline", "nope"])
        .run(&configuration(), &snapshot())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::UnknownGenerator { id }) if id == "nope"
    ));
}

#[test]
fn test_unknown_option_is_reported() {
    let config = configuration()
        .with("known.missing.types.lsit", "typo")
        .with("aot.unknown", "1")
        .with("unrelated.key", "ignored");

    let output = pipeline(&["known.missing.types"])
        .run(&config, &snapshot())
        .unwrap();

    assert_eq!(
        output.diagnostics().get(CONFIGURATION_CATEGORY),
        [
            "unknown option 'known.missing.types.lsit' for 'known.missing.types'",
            "unknown option 'aot.unknown' for 'aot'",
        ]
    );
}

#[test]
fn test_options_checked_against_longest_namespace() {
    let config = configuration().with("known.typo", "1");

    let output = pipeline(&["known.missing.types"])
        .generator(Known)
        .run(&config, &snapshot())
        .unwrap();

    assert_eq!(
        output.diagnostics().get(CONFIGURATION_CATEGORY),
        ["unknown option 'known.typo' for 'known'"]
    );
}

#[test]
fn test_unresolvable_class_dropped_by_default() {
    let output = Pipeline::new(GeneratorRegistry::new())
        .package("app")
        .generator(Synthetic)
        .run(&configuration(), &snapshot())
        .unwrap();
    assert!(output.extra_build_classpath().is_empty());
}

#[test]
fn test_unresolvable_class_fatal_when_strict() {
    let config = configuration().with("aot.classpath.strict", "true");
    let err = Pipeline::new(GeneratorRegistry::new())
        .package("app")
        .generator(Synthetic)
        .run(&config, &snapshot())
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::UnresolvedBuildClass { name, artifact: None }) if name == "app::Proxy"
    ));
}

#[test]
fn test_extra_classpath_from_existing_artifacts() {
    let deps = TempDir::new().unwrap();
    let db = deps.path().join("db");
    fs::create_dir(&db).unwrap();

    let snapshot = ApplicationSnapshot::new()
        .with_types(TypeIndex::new().with_type("app::Database", &db))
        .with_component(ComponentInfo::new("db", "app::Database").eager())
        .with_component(ComponentInfo::new("db-replica", "app::Database").eager());

    let output = pipeline(&["components.eager"])
        .run(&Configuration::new(Runtime::Jit), &snapshot)
        .unwrap();

    assert_eq!(output.extra_build_classpath(), [db]);
}
