//! Built-in generators.
//!
//! - [`InlineResourcesGenerator`] (`resources.inline`) - inlines property resources
//! - [`KnownMissingTypesGenerator`] (`known.missing.types`) - caches failed existence probes
//! - [`EagerComponentsGenerator`] (`components.eager`) - preloads declared components

mod eager_components;
mod inline_resources;
mod known_missing_types;

use aotgen_env::Resolution;

pub use eager_components::EagerComponentsGenerator;
pub use inline_resources::{
    InlineResourcesGenerator, InlinedProperties, PropertiesError, parse_properties,
};
pub use known_missing_types::KnownMissingTypesGenerator;

/// Why a probe for `name` failed, for diagnostics.
fn describe_miss(name: &str, resolution: &Resolution) -> String {
    match resolution {
        Resolution::Found(_) => format!("{}: found", name),
        Resolution::NotFound => format!("{}: not found", name),
        Resolution::LoadFailed { missing } => {
            format!("{}: failed to load, missing dependency {}", name, missing)
        }
    }
}
