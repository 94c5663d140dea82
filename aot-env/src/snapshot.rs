//! Precomputed facts about the application.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TypeIndex, TypeResolver};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A component declared by the application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComponentInfo {
    /// Component name, also the prefix of its configuration properties.
    pub name: String,
    /// Fully-qualified type implementing the component.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the component is created eagerly at startup.
    #[serde(default)]
    pub eager: bool,
}

impl ComponentInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            eager: false,
        }
    }

    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }
}

/// Read-only snapshot of the application environment.
///
/// The snapshot is produced once, before generation, and shared by every
/// generator of a run. It is usually loaded from a JSON file:
///
/// ```json
/// {
///   "types": { "a::Known": { "artifact": "deps/a" } },
///   "components": [ { "name": "db", "type": "app::Database", "eager": true } ],
///   "resources": { "application.properties": "db.enabled=true\n" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApplicationSnapshot {
    /// Types available on the build-time classpath.
    #[serde(default)]
    pub types: TypeIndex,
    /// Components declared by the application, in declaration order.
    #[serde(default)]
    pub components: Vec<ComponentInfo>,
    /// Bundled resources by path.
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
}

impl ApplicationSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a snapshot file.
    ///
    /// Relative artifact paths are resolved against the snapshot's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(snapshot.rebase_artifacts(base))
    }

    /// Set the type index.
    pub fn with_types(mut self, types: TypeIndex) -> Self {
        self.types = types;
        self
    }

    /// Add a declared component.
    pub fn with_component(mut self, component: ComponentInfo) -> Self {
        self.components.push(component);
        self
    }

    /// Add a bundled resource.
    pub fn with_resource(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.resources.insert(path.into(), content.into());
        self
    }

    /// The resolver used for existence probes.
    pub fn resolver(&self) -> &dyn TypeResolver {
        &self.types
    }

    /// Content of a bundled resource.
    pub fn resource(&self, path: &str) -> Option<&str> {
        self.resources.get(path).map(String::as_str)
    }

    fn rebase_artifacts(mut self, base: &Path) -> Self {
        let mut types = TypeIndex::new();
        for (name, mut entry) in std::mem::take(&mut self.types).into_entries() {
            entry.artifact = entry.artifact.map(|artifact| {
                if artifact.is_relative() {
                    base.join(artifact)
                } else {
                    artifact
                }
            });
            types.insert(name, entry);
        }
        self.types = types;
        self
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::Resolution;

    const SNAPSHOT: &str = r#"{
        "types": {
            "a::Known": { "artifact": "deps/a" },
            "c::Broken": { "artifact": "deps/c", "requires": ["b::Missing"] },
            "f::Proxy": {}
        },
        "components": [
            { "name": "db", "type": "app::Database", "eager": true },
            { "name": "cache", "type": "app::Cache" }
        ],
        "resources": { "application.properties": "db.enabled=true\n" }
    }"#;

    #[test]
    fn test_from_json() {
        let snapshot = ApplicationSnapshot::from_json(SNAPSHOT).unwrap();

        assert_eq!(snapshot.types.len(), 3);
        assert_eq!(snapshot.components.len(), 2);
        assert!(snapshot.components[0].eager);
        assert!(!snapshot.components[1].eager);
        assert_eq!(snapshot.components[1].type_name, "app::Cache");
        assert_eq!(
            snapshot.resource("application.properties"),
            Some("db.enabled=true\n")
        );
        assert!(matches!(
            snapshot.resolver().resolve("c::Broken"),
            Resolution::LoadFailed { .. }
        ));
    }

    #[test]
    fn test_empty_json() {
        let snapshot = ApplicationSnapshot::from_json("{}").unwrap();
        assert_eq!(snapshot, ApplicationSnapshot::new());
    }

    #[test]
    fn test_from_file_rebases_relative_artifacts() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snapshot.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let snapshot = ApplicationSnapshot::from_file(&path).unwrap();
        let resolution = snapshot.resolver().resolve("a::Known");
        let handle = resolution.handle().unwrap();

        assert_eq!(handle.artifact(), Some(temp.path().join("deps/a").as_path()));
    }

    #[test]
    fn test_from_file_missing() {
        let temp = TempDir::new().unwrap();
        let err = ApplicationSnapshot::from_file(temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }

    #[test]
    fn test_from_file_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snapshot.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ApplicationSnapshot::from_file(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { .. }));
    }
}
