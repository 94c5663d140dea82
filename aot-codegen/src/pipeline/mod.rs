//! Generation pipeline.
//!
//! A run moves through a fixed sequence of states:
//!
//! - created: generators are selected and option defaults applied
//! - context built: the single [`GenerationContext`] exists and the
//!   configuration has been validated
//! - generators running: each [`Generator`] runs in order against the context
//! - assembled: fragments are rendered into one initializer
//! - done: a [`GenerationOutput`] is returned
//!
//! Generators communicate only through the context. Later generators can read
//! side-channel values and diagnostics left by earlier ones, which is why run
//! order is part of the configuration.

mod context;
mod diagnostic;
mod error;
mod extensions;
mod fragment;
mod generator;
pub mod options;
mod output;
mod registry;
mod runner;

pub use context::GenerationContext;
pub use diagnostic::{CONFIGURATION_CATEGORY, Diagnostics};
pub use error::PipelineError;
pub use extensions::Extensions;
pub use fragment::{FragmentKind, InitFragment, InitFunction, string_literal};
pub use generator::Generator;
pub use output::{
    EXCLUDED_RESOURCES_FILE, EXTRA_CLASSPATH_FILE, FragmentRecord, GenerationOutput,
    INITIALIZER_FILE, REPORT_FILE, SourceFile,
};
pub use registry::{GeneratorDoc, GeneratorRegistry, OptionDoc};
pub use runner::{Pipeline, PipelineState};
