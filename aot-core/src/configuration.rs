//! Immutable run configuration.

use std::collections::BTreeMap;

use crate::{ConfigOption, Error, Result, Runtime, split_list};

/// Key/value parameters of a generation run plus the target runtime.
///
/// A configuration is assembled before the generation context exists and is
/// read-only afterwards. Keys iterate in sorted order so anything derived from
/// the configuration is reproducible.
///
/// # Example
///
/// ```
/// use aotgen_core::{Configuration, Runtime};
///
/// let config = Configuration::new(Runtime::Native)
///     .with("known.missing.types.enabled", "TRUE")
///     .with("known.missing.types.list", "a::Known, b::Missing,");
///
/// assert!(config.is_enabled("known.missing.types").unwrap());
/// assert_eq!(config.string_list("known.missing.types.list"), ["a::Known", "b::Missing"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
    runtime: Runtime,
}

impl Configuration {
    /// Create an empty configuration targeting the given runtime.
    pub fn new(runtime: Runtime) -> Self {
        Self {
            entries: BTreeMap::new(),
            runtime,
        }
    }

    /// Create a configuration from existing entries.
    pub fn from_entries(
        runtime: Runtime,
        entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            runtime,
        }
    }

    /// Return a copy with one more entry, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Return a copy where every option absent from this configuration is set
    /// to its default. Values already present are kept.
    pub fn with_defaults<'a>(&self, options: impl IntoIterator<Item = &'a ConfigOption>) -> Self {
        let mut entries = self.entries.clone();
        for option in options {
            entries
                .entry(option.key().to_string())
                .or_insert_with(|| option.default_value().to_string());
        }
        Self {
            entries,
            runtime: self.runtime,
        }
    }

    /// The runtime targeted by this run.
    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    /// Check whether a key has a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw string value of a key.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Comma-separated list value of a key; an absent key is an empty list.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.string(key).map(split_list).unwrap_or_default()
    }

    /// Boolean value of a key, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBoolean`] when the value is neither `true` nor
    /// `false` (case-insensitive).
    pub fn boolean(&self, key: &str, default: bool) -> Result<bool> {
        match self.string(key) {
            None => Ok(default),
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(Error::InvalidBoolean {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
            },
        }
    }

    /// Whether the unit with the given id is switched on via `<id>.enabled`.
    pub fn is_enabled(&self, id: &str) -> Result<bool> {
        self.boolean(&format!("{}.enabled", id), false)
    }

    /// Keys starting with `prefix`, in sorted order.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .keys()
            .filter(move |k| k.starts_with(prefix))
            .map(String::as_str)
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list_parsing() {
        let config = Configuration::new(Runtime::Jit).with("list", " a , b,, c ,");
        assert_eq!(config.string_list("list"), vec!["a", "b", "c"]);
        assert!(config.string_list("absent").is_empty());
    }

    #[test]
    fn test_boolean_parsing() {
        let config = Configuration::new(Runtime::Jit)
            .with("a", "TRUE")
            .with("b", "False")
            .with("c", "yes");

        assert!(config.boolean("a", false).unwrap());
        assert!(!config.boolean("b", true).unwrap());
        assert!(config.boolean("absent", true).unwrap());
        assert!(!config.boolean("absent", false).unwrap());

        let err = config.boolean("c", false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid boolean 'yes' for 'c', expected 'true' or 'false'"
        );
    }

    #[test]
    fn test_is_enabled() {
        let config = Configuration::new(Runtime::Native).with("x.enabled", "true");
        assert!(config.is_enabled("x").unwrap());
        assert!(!config.is_enabled("y").unwrap());
    }

    #[test]
    fn test_with_defaults_keeps_user_values() {
        const A: ConfigOption = ConfigOption::new("a", "", "default-a");
        const B: ConfigOption = ConfigOption::new("b", "", "default-b");

        let config = Configuration::new(Runtime::Jit).with("a", "user");
        let effective = config.with_defaults([&A, &B]);

        assert_eq!(effective.string("a"), Some("user"));
        assert_eq!(effective.string("b"), Some("default-b"));
        assert_eq!(effective.runtime(), Runtime::Jit);
        // The source configuration is untouched
        assert!(!config.contains("b"));
    }

    #[test]
    fn test_keys_with_prefix() {
        let config = Configuration::from_entries(
            Runtime::Jit,
            [("x.b", "1"), ("x.a", "2"), ("y.a", "3")],
        );
        let keys: Vec<_> = config.keys_with_prefix("x.").collect();
        assert_eq!(keys, vec!["x.a", "x.b"]);
    }
}
