use std::{
    cmp::Ordering,
    fmt,
    path::{Path, PathBuf},
};

use serde::Serialize;

/// An opaque reference to a type known to the build-time environment.
///
/// The handle remembers the artifact (a directory or archive) the type was
/// loaded from. Handles without an artifact are synthetic: they exist only at
/// runtime and never contribute a build classpath entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeHandle {
    name: String,
    artifact: Option<PathBuf>,
}

impl TypeHandle {
    /// Create a handle for a type loaded from `artifact`.
    pub fn new(name: impl Into<String>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            artifact: Some(artifact.into()),
        }
    }

    /// Create a handle for a type with no originating artifact.
    pub fn synthetic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact: None,
        }
    }

    /// Fully-qualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The artifact this type was loaded from, if any.
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    /// Resolve the artifact to a location that exists on the local file system.
    ///
    /// Returns `None` for synthetic handles and for artifacts that are no
    /// longer present.
    pub fn location(&self) -> Option<&Path> {
        self.artifact().filter(|path| path.exists())
    }
}

impl PartialOrd for TypeHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.artifact.cmp(&other.artifact))
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_synthetic_has_no_location() {
        let handle = TypeHandle::synthetic("app::Proxy");
        assert!(handle.artifact().is_none());
        assert!(handle.location().is_none());
    }

    #[test]
    fn test_location_requires_existing_artifact() {
        let temp = TempDir::new().unwrap();
        let present = TypeHandle::new("a::Known", temp.path());
        let gone = TypeHandle::new("b::Gone", temp.path().join("missing.rlib"));

        assert_eq!(present.location(), Some(temp.path()));
        assert!(gone.artifact().is_some());
        assert!(gone.location().is_none());
    }

    #[test]
    fn test_ordering_by_name() {
        let mut handles = vec![
            TypeHandle::synthetic("c::C"),
            TypeHandle::synthetic("a::A"),
            TypeHandle::synthetic("b::B"),
        ];
        handles.sort();
        let names: Vec<_> = handles.iter().map(TypeHandle::name).collect();
        assert_eq!(names, vec!["a::A", "b::B", "c::C"]);
    }
}
