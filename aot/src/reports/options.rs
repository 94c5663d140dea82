//! Options command report data structures.

use aotgen_codegen::pipeline::GeneratorDoc;

use super::output::{Output, Report};

/// Documentation of registered generators.
#[derive(Debug)]
pub struct OptionsReport {
    pub generators: Vec<GeneratorDoc>,
}

impl Report for OptionsReport {
    fn render(&self, out: &mut dyn Output) {
        for (index, generator) in self.generators.iter().enumerate() {
            if index > 0 {
                out.blank();
            }
            out.heading(&generator.id);
            if let Some(description) = &generator.description {
                out.text(&format!("  {}", description));
            }
            for option in &generator.options {
                out.item(&format!("{} (default: {})", option.key, option.default));
                out.text(&format!("      {}", option.description));
            }
        }
    }
}
