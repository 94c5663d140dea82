//! Structural pipeline failures.
//!
//! These abort a run. They travel as [`eyre::Report`]s and can be recovered
//! with `downcast_ref::<PipelineError>()`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no package name configured for the run")]
    MissingPackage,

    #[error("invalid package name '{package}': segments must be non-keyword Rust identifiers")]
    InvalidPackage { package: String },

    #[error("unknown generator '{id}'")]
    UnknownGenerator { id: String },

    #[error("generator '{id}' is registered more than once")]
    DuplicateGenerator { id: String },

    #[error("invalid fragment name '{name}': not a Rust identifier")]
    InvalidFragmentName { name: String },

    #[error("fragment '{name}' is emitted more than once")]
    DuplicateFragment { name: String },

    #[error("type '{name}' is needed at build time but has no resolvable location")]
    UnresolvedBuildClass { name: String, artifact: Option<PathBuf> },
}
