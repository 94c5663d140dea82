//! Options operation - document registered generators.

use aotgen_codegen::{GeneratorRegistry, pipeline::PipelineError};
use eyre::Result;

use crate::reports::OptionsReport;

/// Collect the documentation of every generator, or of the one named.
pub fn options(registry: &GeneratorRegistry, only: Option<&str>) -> Result<OptionsReport> {
    let mut generators = registry.docs();
    if let Some(id) = only {
        generators.retain(|doc| doc.id == id);
        if generators.is_empty() {
            return Err(PipelineError::UnknownGenerator { id: id.to_string() }.into());
        }
    }

    Ok(OptionsReport { generators })
}
