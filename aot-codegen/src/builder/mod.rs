//! Source emission primitives.
//!
//! Generators and the driver describe Rust source as [`CodeFragment`] trees;
//! [`CodeBuilder`] turns them into indented text and [`ImportCollector`]
//! merges the `use` declarations of every contributor.

mod code_builder;
mod imports;
mod renderable;

pub use code_builder::CodeBuilder;
pub use imports::ImportCollector;
pub use renderable::{CodeFragment, Renderable};
