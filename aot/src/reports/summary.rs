//! What a pipeline run produced, shared by `generate` and `check`.

use std::path::PathBuf;

use aotgen_codegen::GenerationOutput;

use super::output::Output;

#[derive(Debug)]
pub struct RunSummary {
    pub package: String,
    pub runtime: String,
    /// Ids of the generators that ran, in order.
    pub generators: Vec<String>,
    pub excluded_resources: Vec<String>,
    pub extra_build_classpath: Vec<PathBuf>,
    /// Messages by category, in insertion order.
    pub diagnostics: Vec<(String, Vec<String>)>,
}

impl From<&GenerationOutput> for RunSummary {
    fn from(output: &GenerationOutput) -> Self {
        Self {
            package: output.package().to_string(),
            runtime: output.runtime().to_string(),
            generators: output.generators().to_vec(),
            excluded_resources: output.excluded_resources().to_vec(),
            extra_build_classpath: output.extra_build_classpath().to_vec(),
            diagnostics: output
                .diagnostics()
                .iter()
                .map(|(category, messages)| (category.to_string(), messages.to_vec()))
                .collect(),
        }
    }
}

impl RunSummary {
    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.iter().map(|(_, messages)| messages.len()).sum()
    }

    pub(crate) fn render(&self, out: &mut dyn Output) {
        out.field("Package", &self.package);
        out.field("Runtime", &self.runtime);
        out.blank();

        out.heading(&format!("Generators ({})", self.generators.len()));
        for id in &self.generators {
            out.item(id);
        }

        if !self.excluded_resources.is_empty() {
            out.blank();
            out.heading("Excluded resources");
            for resource in &self.excluded_resources {
                out.item(resource);
            }
        }

        if !self.extra_build_classpath.is_empty() {
            out.blank();
            out.heading("Extra build classpath");
            for location in &self.extra_build_classpath {
                out.item(&location.display().to_string());
            }
        }

        if !self.diagnostics.is_empty() {
            out.blank();
            out.heading(&format!("Diagnostics ({})", self.diagnostic_count()));
            for (category, messages) in &self.diagnostics {
                for message in messages {
                    out.detail(category, message);
                }
            }
        }
    }
}
