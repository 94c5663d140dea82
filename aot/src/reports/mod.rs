//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod generate;
mod options;
mod output;
mod summary;

pub use check::CheckReport;
pub use generate::{GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};
pub use options::OptionsReport;
pub use output::{Report, TerminalOutput};
pub use summary::RunSummary;
