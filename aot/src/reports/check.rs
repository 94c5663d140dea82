//! Check command report data structures.

use std::path::PathBuf;

use super::{
    RunSummary,
    output::{Output, Report},
};

/// Report data from a run that wrote nothing.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the run file.
    pub config_path: PathBuf,
    pub summary: RunSummary,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        self.summary.render(out);
        out.blank();

        let count = self.summary.diagnostic_count();
        if count == 0 {
            out.text(&format!("✓ {} is valid", self.config_path.display()));
        } else {
            out.text(&format!(
                "✓ {} is valid ({} diagnostic{})",
                self.config_path.display(),
                count,
                if count == 1 { "" } else { "s" }
            ));
        }
    }
}
