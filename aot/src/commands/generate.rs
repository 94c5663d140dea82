use std::path::PathBuf;

use aotgen_config::AotToml;
use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to aot.toml (defaults to ./aot.toml)
    #[arg(short, long, default_value = "aot.toml")]
    pub config: PathBuf,

    /// Output directory (overrides aot.toml setting)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preview generated files without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let aot_toml = AotToml::open(&self.config).unwrap_or_exit();
        let output_dir = self
            .output
            .clone()
            .unwrap_or_else(|| aot_toml.output_dir());

        let report = ops::generate(
            &aot_toml,
            GenerateOptions {
                output_dir: &output_dir,
                dry_run: self.dry_run,
            },
        )?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
