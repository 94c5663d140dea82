//! Core operations.
//!
//! This module contains the business logic for aotgen commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;
pub mod options;

use aotgen_codegen::{GenerationOutput, GeneratorRegistry, Pipeline};
use aotgen_config::AotToml;
use aotgen_env::ApplicationSnapshot;
use eyre::{Context, Result};
use tracing::debug;

pub use check::check;
pub use generate::{GenerateOptions, generate};
pub use options::options;

/// Load the snapshot the run file names, or an empty one.
fn load_snapshot(aot_toml: &AotToml) -> Result<ApplicationSnapshot> {
    match aot_toml.snapshot_path() {
        Some(path) => ApplicationSnapshot::from_file(&path).wrap_err("Failed to load snapshot"),
        None => {
            debug!("no snapshot configured, analyzing an empty application");
            Ok(ApplicationSnapshot::new())
        }
    }
}

/// Run the built-in generators the way the run file describes.
fn run_pipeline(aot_toml: &AotToml) -> Result<GenerationOutput> {
    let run = aot_toml.run();
    let snapshot = load_snapshot(aot_toml)?;

    let mut pipeline = Pipeline::new(GeneratorRegistry::builtin()).package(&run.aot.package);
    if let Some(ids) = &run.aot.generators {
        pipeline = pipeline.order(ids.iter().cloned());
    }

    pipeline
        .run(&run.configuration(), &snapshot)
        .wrap_err("Pipeline failed")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_run(dir: &TempDir, run: &str) -> AotToml {
        let path = dir.path().join("aot.toml");
        fs::write(&path, run).unwrap();
        AotToml::open(&path).unwrap()
    }

    #[test]
    fn test_missing_snapshot_means_empty_application() {
        let dir = TempDir::new().unwrap();
        let aot_toml = write_run(
            &dir,
            "[aot]\npackage = \"app::aot\"\ngenerators = [\"known.missing.types\"]\n",
        );

        let output = run_pipeline(&aot_toml).unwrap();

        assert_eq!(output.generators(), ["known.missing.types"]);
        assert_eq!(
            output.diagnostics().get("known.missing.types"),
            ["inject::Inject: not found", "app::SomeType: not found"]
        );
    }

    #[test]
    fn test_snapshot_is_read_relative_to_run_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("env.json"),
            r#"{"types": {"inject::Inject": {"artifact": "deps/inject"}}}"#,
        )
        .unwrap();
        let aot_toml = write_run(
            &dir,
            "[aot]\npackage = \"app::aot\"\nsnapshot = \"env.json\"\ngenerators = [\"known.missing.types\"]\n",
        );

        let output = run_pipeline(&aot_toml).unwrap();

        assert_eq!(
            output.diagnostics().get("known.missing.types"),
            ["app::SomeType: not found"]
        );
    }

    #[test]
    fn test_unreadable_snapshot_fails() {
        let dir = TempDir::new().unwrap();
        let aot_toml = write_run(&dir, "[aot]\npackage = \"app\"\nsnapshot = \"absent.json\"\n");

        let err = run_pipeline(&aot_toml).unwrap_err();
        assert_eq!(err.to_string(), "Failed to load snapshot");
    }
}
