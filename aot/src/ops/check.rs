//! Check operation - run the pipeline without writing.

use aotgen_config::AotToml;
use eyre::Result;

use super::run_pipeline;
use crate::reports::{CheckReport, RunSummary};

/// Execute the check operation.
pub fn check(aot_toml: &AotToml) -> Result<CheckReport> {
    let output = run_pipeline(aot_toml)?;

    Ok(CheckReport {
        config_path: aot_toml.path().to_path_buf(),
        summary: RunSummary::from(&output),
    })
}
