//! Run file schema and parsing.

use std::{collections::BTreeMap, path::PathBuf, str::FromStr};

use aotgen_core::{Configuration, Runtime};
use serde::Deserialize;

use crate::{
    Error, Result,
    error::SourceContext,
    validate::{find_key_span, find_value_span, validate_package},
};

/// The `[aot]` section of a run file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AotSection {
    /// Module path the generated code is qualified under (e.g. `my_app::aot`).
    pub package: String,
    /// Target runtime.
    #[serde(default)]
    pub runtime: Runtime,
    /// Environment snapshot to load, relative to the run file.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
    /// Output directory, relative to the run file.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Explicit generator order. When absent, every enabled generator runs in
    /// registration order.
    #[serde(default)]
    pub generators: Option<Vec<String>>,
}

fn default_output() -> PathBuf {
    PathBuf::from("target/aot")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunFile {
    aot: AotSection,
    #[serde(default)]
    options: BTreeMap<String, toml::Value>,
}

/// A parsed and validated `aot.toml`.
#[derive(Debug, Clone)]
pub struct RunFile {
    /// Run metadata.
    pub aot: AotSection,
    /// Option values, stringified (arrays are joined with commas).
    pub options: BTreeMap<String, String>,
}

impl RunFile {
    /// Parse a run file with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let source = SourceContext::new(content, filename);
        let raw: RawRunFile = toml::from_str(content).map_err(|e| source.parse_error(e))?;

        if let Some(reason) = validate_package(&raw.aot.package) {
            let span = find_value_span(source.src(), &raw.aot.package);
            return Err(source.invalid_package_error(&raw.aot.package, reason, span));
        }

        if let Some(generators) = &raw.aot.generators {
            for (i, id) in generators.iter().enumerate() {
                if generators[..i].contains(id) {
                    let span = find_repeated_value_span(source.src(), id);
                    return Err(source.duplicate_generator_error(id, span));
                }
            }
        }

        let mut options = BTreeMap::new();
        for (key, value) in &raw.options {
            flatten_option(key.clone(), value, &mut options).map_err(|(key, kind)| {
                let leaf = key.rsplit('.').next().unwrap_or(&key);
                let span = find_key_span(source.src(), &key)
                    .or_else(|| find_key_span(source.src(), leaf));
                source.unsupported_value_error(&key, kind, span)
            })?;
        }

        Ok(Self {
            aot: raw.aot,
            options,
        })
    }

    /// Build the run configuration from the option values and runtime.
    pub fn configuration(&self) -> Configuration {
        Configuration::from_entries(self.aot.runtime, self.options.clone())
    }
}

impl FromStr for RunFile {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "aot.toml")
    }
}

/// Flatten an option value into dotted keys.
///
/// Unquoted dotted keys (`a.b.c = 1`) and inline tables parse as nested
/// tables; each leaf becomes one `a.b.c` entry. On failure returns the full
/// key and the TOML type name of the offending value.
fn flatten_option(
    key: String,
    value: &toml::Value,
    out: &mut BTreeMap<String, String>,
) -> std::result::Result<(), (String, &'static str)> {
    match value {
        toml::Value::Table(table) => {
            for (child, value) in table {
                flatten_option(format!("{}.{}", key, child), value, out)?;
            }
            Ok(())
        }
        other => {
            let text = option_value_to_string(other).map_err(|kind| (key.clone(), kind))?;
            out.insert(key, text);
            Ok(())
        }
    }
}

/// Convert an option value to its configuration string.
///
/// Returns the TOML type name of the offending value when it cannot be
/// represented.
fn option_value_to_string(value: &toml::Value) -> std::result::Result<String, &'static str> {
    match value {
        toml::Value::Array(items) => {
            let parts = items
                .iter()
                .map(scalar_to_string)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(parts.join(","))
        }
        other => scalar_to_string(other),
    }
}

fn scalar_to_string(value: &toml::Value) -> std::result::Result<String, &'static str> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(d) => Ok(d.to_string()),
        other => Err(other.type_str()),
    }
}

/// Span of the second quoted occurrence of `value`, which is where a
/// duplicate list entry shows up.
fn find_repeated_value_span(src: &str, value: &str) -> Option<miette::SourceSpan> {
    let pattern = format!("\"{}\"", value);
    src.match_indices(&pattern)
        .nth(1)
        .map(|(pos, _)| miette::SourceSpan::from((pos + 1, value.len())))
}
