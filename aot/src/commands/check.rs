use std::path::PathBuf;

use aotgen_config::AotToml;
use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to aot.toml (defaults to ./aot.toml)
    #[arg(short, long, default_value = "aot.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let aot_toml = AotToml::open(&self.config).unwrap_or_exit();

        let report = ops::check(&aot_toml)?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
