use aotgen_codegen::GeneratorRegistry;
use clap::Args;
use eyre::Result;

use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct OptionsCommand {
    /// Only show this generator
    pub generator: Option<String>,
}

impl OptionsCommand {
    pub fn run(&self) -> Result<()> {
        let registry = GeneratorRegistry::builtin();
        let report = ops::options(&registry, self.generator.as_deref())?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
