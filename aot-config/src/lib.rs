// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Parsing and validation of `aot.toml` run files.
//!
//! A run file names the package generated code lives in, the target runtime,
//! the environment snapshot, and the option values handed to generators.

mod error;
mod file;
mod run;
mod validate;

pub use error::{Error, Result};
pub use file::AotToml;
pub use run::{AotSection, RunFile};
