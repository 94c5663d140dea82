//! Generate operation - run the pipeline and write its artifacts.

use std::path::Path;

use aotgen_config::AotToml;
use eyre::{Context, Result};

use super::run_pipeline;
use crate::reports::{
    GenerateReport, GenerationResult, PreviewFile, PreviewResult, RunSummary, WrittenResult,
};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Directory the artifacts are written below.
    pub output_dir: &'a Path,
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the generate operation.
///
/// Nothing is written when the pipeline fails.
pub fn generate(aot_toml: &AotToml, opts: GenerateOptions) -> Result<GenerateReport> {
    let output = run_pipeline(aot_toml)?;

    let result = if opts.dry_run {
        let files = output
            .files()?
            .into_iter()
            .map(|(path, content)| PreviewFile {
                path: path.display().to_string(),
                content,
            })
            .collect();
        GenerationResult::Preview(PreviewResult { files })
    } else {
        let files = output
            .write_to(opts.output_dir)
            .wrap_err("Failed to write generated files")?;
        GenerationResult::Written(WrittenResult {
            output_dir: opts.output_dir.to_path_buf(),
            files,
        })
    };

    Ok(GenerateReport {
        summary: RunSummary::from(&output),
        result,
    })
}
