//! Core configuration types for the aotgen source generator.
//!
//! This crate provides the declarative option descriptors, the immutable
//! run configuration and the target runtime shared by every other aotgen crate.

mod configuration;
mod error;
mod option;
mod runtime;
mod utils;

pub use configuration::Configuration;
pub use error::{Error, Result};
pub use option::ConfigOption;
pub use runtime::Runtime;
pub use utils::{is_rust_keyword, split_list};
