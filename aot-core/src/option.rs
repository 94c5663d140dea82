//! Declarative configuration option descriptors.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// A named, documented configuration key with a default value.
///
/// Options are purely declarative: generators declare the options they read so
/// that the driver can fill in defaults and the CLI can document them. Two
/// options are the same option when their keys are equal.
///
/// List defaults are serialized as comma-separated strings.
///
/// # Example
///
/// ```
/// use aotgen_core::ConfigOption;
///
/// const LIST: ConfigOption = ConfigOption::new(
///     "known.missing.types.list",
///     "Types to check for existence (comma separated)",
///     "a::Known,b::Missing",
/// );
///
/// assert_eq!(LIST.key(), "known.missing.types.list");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigOption {
    key: &'static str,
    description: &'static str,
    default: &'static str,
}

impl ConfigOption {
    /// Declare a new option.
    pub const fn new(key: &'static str, description: &'static str, default: &'static str) -> Self {
        Self {
            key,
            description,
            default,
        }
    }

    /// The configuration key.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Default value used when the key is absent.
    pub fn default_value(&self) -> &'static str {
        self.default
    }
}

impl PartialEq for ConfigOption {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ConfigOption {}

impl Hash for ConfigOption {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for ConfigOption {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConfigOption {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(other.key)
    }
}

impl fmt::Display for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_identity_is_key() {
        let a = ConfigOption::new("x.list", "first", "a");
        let b = ConfigOption::new("x.list", "second", "b");
        let c = ConfigOption::new("y.list", "first", "a");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_accessors() {
        let opt = ConfigOption::new("x.enabled", "Enables x", "false");
        assert_eq!(opt.key(), "x.enabled");
        assert_eq!(opt.description(), "Enables x");
        assert_eq!(opt.default_value(), "false");
        assert_eq!(opt.to_string(), "x.enabled");
    }
}
