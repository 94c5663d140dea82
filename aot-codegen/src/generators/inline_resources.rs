//! Property resources inlined into generated code.

use std::collections::BTreeMap;

use aotgen_core::ConfigOption;
use aotgen_env::Resolution;
use eyre::{Result, WrapErr};
use thiserror::Error;
use tracing::debug;

use crate::pipeline::{GenerationContext, Generator, InitFragment, string_literal};

const ID: &str = "resources.inline";

const PATHS: ConfigOption = ConfigOption::new(
    "resources.inline.paths",
    "Property resources to inline into generated code (comma separated)",
    "application.properties",
);

const OPTIONS: &[ConfigOption] = &[PATHS];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertiesError {
    #[error("{resource}:{line}: expected 'key=value' or 'key: value', found '{content}'")]
    Malformed {
        resource: String,
        line: usize,
        content: String,
    },
}

/// Properties inlined by `resources.inline`, left on the side channel for
/// generators that run later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlinedProperties {
    entries: BTreeMap<String, String>,
}

impl InlinedProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Add every entry of `other`, replacing existing keys.
    pub fn merge(&mut self, other: BTreeMap<String, String>) {
        self.entries.extend(other);
    }

    /// Whether `<prefix>.enabled` is set to `false`.
    pub fn is_disabled(&self, prefix: &str) -> bool {
        self.get(&format!("{}.enabled", prefix))
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("false"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse properties text.
///
/// Each non-blank line that does not start with `#` or `!` must hold a key
/// and a value separated by the first `=` or `:`. Keys and values are
/// trimmed. A later key replaces an earlier one.
///
/// ```
/// use aotgen_codegen::generators::parse_properties;
///
/// let props = parse_properties("app.properties", "# db\ndb.url = jdbc:h2\ndb.enabled: false\n").unwrap();
/// assert_eq!(props["db.url"], "jdbc:h2");
/// assert_eq!(props["db.enabled"], "false");
/// ```
pub fn parse_properties(
    resource: &str,
    text: &str,
) -> Result<BTreeMap<String, String>, PropertiesError> {
    let mut entries = BTreeMap::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let malformed = || PropertiesError::Malformed {
            resource: resource.to_string(),
            line: index + 1,
            content: line.to_string(),
        };
        let split = line.find(['=', ':']).ok_or_else(malformed)?;
        let key = line[..split].trim();
        if key.is_empty() {
            return Err(malformed());
        }
        entries.insert(key.to_string(), line[split + 1..].trim().to_string());
    }
    Ok(entries)
}

/// Inlines property resources.
///
/// Each configured resource found in the snapshot is parsed and excluded from
/// packaging, and its properties are seeded into a runtime slot at startup.
/// The merged properties are put on the side channel as
/// [`InlinedProperties`]. Resources absent from the snapshot are reported as
/// diagnostics; a malformed line fails the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineResourcesGenerator;

impl Generator for InlineResourcesGenerator {
    fn id(&self) -> &str {
        ID
    }

    fn description(&self) -> Option<&str> {
        Some("Inlines property resources so they are not parsed at startup")
    }

    fn options(&self) -> &[ConfigOption] {
        OPTIONS
    }

    fn generate_static_init(&self, ctx: &mut GenerationContext<'_>) -> Result<Option<InitFragment>> {
        let analyzer = ctx.analyzer();
        let mut properties = ctx.get::<InlinedProperties>().cloned().unwrap_or_default();
        let mut inlined = 0;

        for path in ctx.configuration().string_list(PATHS.key()) {
            let Some(text) = analyzer.resource(&path) else {
                ctx.add_diagnostic(ID, format!("{}: resource not found", path));
                continue;
            };
            let parsed = parse_properties(&path, text)
                .wrap_err_with(|| format!("failed to inline {}", path))?;
            debug!(resource = %path, properties = parsed.len(), "inlined resource");
            properties.merge(parsed);
            ctx.register_excluded_resource(path);
            inlined += 1;
        }

        if inlined == 0 {
            return Ok(None);
        }

        let runtime = ctx.runtime_crate().to_string();
        let source_type = format!("{}::PropertySource", runtime);
        if let Resolution::Found(handle) = analyzer.resolver().resolve(&source_type) {
            ctx.register_class_needed_at_build_time(handle);
        }

        let binding = if properties.is_empty() { "let" } else { "let mut" };
        let fragment = InitFragment::new("seed_inlined_properties")
            .doc("Seeds the properties inlined from bundled resources.")
            .uses("std::collections::BTreeMap")
            .uses(format!("{}::StaticOptimizations", runtime))
            .uses(format!("{}::InlinedProperties", runtime))
            .line(format!(
                "{} properties: BTreeMap<&'static str, &'static str> = BTreeMap::new();",
                binding
            ))
            .lines(properties.iter().map(|(key, value)| {
                format!(
                    "properties.insert({}, {});",
                    string_literal(key),
                    string_literal(value)
                )
            }))
            .line("StaticOptimizations::set(InlinedProperties::new(properties));");

        ctx.put(properties);
        Ok(Some(fragment))
    }
}
