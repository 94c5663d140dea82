//! Ahead-of-time source generation for aotgen.
//!
//! This crate holds the coordination substrate of a generation run and the
//! built-in generators.
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, CodeFragment, etc.)
//! - [`pipeline`] - Generation context, generator contract, registry and driver
//! - [`generators`] - Built-in generators

pub mod builder;
pub mod generators;
pub mod pipeline;

pub use pipeline::{
    GenerationContext, GenerationOutput, Generator, GeneratorRegistry, InitFragment, Pipeline,
};
