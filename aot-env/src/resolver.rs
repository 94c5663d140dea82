//! Existence probes against the build-time type environment.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::TypeHandle;

/// Outcome of resolving a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The type exists and all of its dependencies resolve.
    Found(TypeHandle),
    /// No type with this name is known.
    NotFound,
    /// The type is known but cannot be loaded because a dependency is missing.
    LoadFailed {
        /// The first transitive dependency that could not be found.
        missing: String,
    },
}

impl Resolution {
    /// Returns true if the probe failed for any reason.
    pub fn is_missing(&self) -> bool {
        !matches!(self, Resolution::Found(_))
    }

    /// The resolved handle, if the probe succeeded.
    pub fn handle(&self) -> Option<&TypeHandle> {
        match self {
            Resolution::Found(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Something that can attempt to resolve a type by name.
///
/// Resolution is local and synchronous. A failure is final for that single
/// name and never an error: callers turn it into data.
pub trait TypeResolver: Send + Sync {
    /// Attempt to resolve a fully-qualified type name.
    fn resolve(&self, name: &str) -> Resolution;
}

/// A type as recorded in the build-time index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeEntry {
    /// The artifact the type is loaded from; `None` for synthetic types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    /// Types that must also be present for this type to load.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

/// In-memory index of the types available at build time.
///
/// # Example
///
/// ```
/// use aotgen_env::{Resolution, TypeIndex, TypeResolver};
///
/// let index = TypeIndex::new()
///     .with_type("a::Known", "deps/a")
///     .with_dependent_type("c::Broken", "deps/c", ["b::Missing"]);
///
/// assert!(!index.resolve("a::Known").is_missing());
/// assert_eq!(index.resolve("b::Missing"), Resolution::NotFound);
/// assert!(matches!(index.resolve("c::Broken"), Resolution::LoadFailed { .. }));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TypeIndex {
    types: BTreeMap<String, TypeEntry>,
}

impl TypeIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type loaded from `artifact`.
    pub fn with_type(mut self, name: impl Into<String>, artifact: impl Into<PathBuf>) -> Self {
        self.insert(
            name,
            TypeEntry {
                artifact: Some(artifact.into()),
                requires: Vec::new(),
            },
        );
        self
    }

    /// Add a type that needs other types to load.
    pub fn with_dependent_type(
        mut self,
        name: impl Into<String>,
        artifact: impl Into<PathBuf>,
        requires: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.insert(
            name,
            TypeEntry {
                artifact: Some(artifact.into()),
                requires: requires.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Add a synthetic type with no artifact.
    pub fn with_synthetic_type(mut self, name: impl Into<String>) -> Self {
        self.insert(name, TypeEntry::default());
        self
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, entry: TypeEntry) {
        self.types.insert(name.into(), entry);
    }

    /// Check whether a type name is recorded, ignoring its dependencies.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of recorded types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, TypeEntry)> {
        self.types.into_iter()
    }

    /// Find the first dependency of `name` that is not recorded, walking
    /// `requires` transitively. Cycles are visited once.
    fn first_missing_dependency(&self, name: &str) -> Option<String> {
        let mut visited = BTreeSet::new();
        let mut stack = vec![name];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(entry) = self.types.get(current) else {
                return Some(current.to_string());
            };
            // Reverse so dependencies are checked in declaration order
            stack.extend(entry.requires.iter().rev().map(String::as_str));
        }

        None
    }
}

impl TypeResolver for TypeIndex {
    fn resolve(&self, name: &str) -> Resolution {
        let Some(entry) = self.types.get(name) else {
            tracing::debug!(name, "type not found");
            return Resolution::NotFound;
        };

        if let Some(missing) = self.first_missing_dependency(name) {
            tracing::debug!(name, %missing, "type failed to load");
            return Resolution::LoadFailed { missing };
        }

        Resolution::Found(match &entry.artifact {
            Some(artifact) => TypeHandle::new(name, artifact),
            None => TypeHandle::synthetic(name),
        })
    }
}
