use std::path::{Path, PathBuf};

use crate::{Error, Result, RunFile};

/// Represents an aot.toml file with both its location and the parsed run.
pub struct AotToml {
    path: PathBuf,
    run: RunFile,
}

impl AotToml {
    /// Open and parse an aot.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let run = RunFile::from_str_with_filename(&content, &filename)?;

        Ok(Self { path, run })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the parsed run file.
    pub fn run(&self) -> &RunFile {
        &self.run
    }

    /// Directory relative paths in the run file are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Resolved snapshot location, if the run names one.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.run
            .aot
            .snapshot
            .as_ref()
            .map(|snapshot| self.base_dir().join(snapshot))
    }

    /// Resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir().join(&self.run.aot.output)
    }
}
