//! Artifacts of a finished run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use aotgen_core::Runtime;
use eyre::{Result, WrapErr};
use serde::Serialize;

use super::{Diagnostics, FragmentKind};

/// File name of the exclusion list.
pub const EXCLUDED_RESOURCES_FILE: &str = "excluded-resources.txt";
/// File name of the extra classpath list.
pub const EXTRA_CLASSPATH_FILE: &str = "extra-classpath.txt";
/// File name of the JSON run report.
pub const REPORT_FILE: &str = "aot-report.json";
/// File name of the aggregate initializer, inside the package directory.
pub const INITIALIZER_FILE: &str = "initializer.rs";

/// A generated source file, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A function contributed to the initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentRecord {
    pub generator: String,
    pub kind: FragmentKind,
    pub name: String,
}

/// Everything a successful run hands to packaging.
///
/// An output only exists when every generator succeeded.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub(crate) package: String,
    pub(crate) runtime: Runtime,
    pub(crate) initializer: SourceFile,
    pub(crate) fragments: Vec<FragmentRecord>,
    pub(crate) excluded_resources: Vec<String>,
    pub(crate) extra_build_classpath: Vec<PathBuf>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) generators: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    package: &'a str,
    runtime: Runtime,
    generators: &'a [String],
    fragments: &'a [FragmentRecord],
    excluded_resources: &'a [String],
    extra_build_classpath: &'a [PathBuf],
    diagnostics: &'a Diagnostics,
}

impl GenerationOutput {
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    /// The aggregate initializer source.
    pub fn initializer(&self) -> &SourceFile {
        &self.initializer
    }

    /// Functions of the initializer, in invocation order.
    pub fn fragments(&self) -> &[FragmentRecord] {
        &self.fragments
    }

    /// Resources packaging must not bundle, sorted.
    pub fn excluded_resources(&self) -> &[String] {
        &self.excluded_resources
    }

    /// Locations to add to the build classpath.
    pub fn extra_build_classpath(&self) -> &[PathBuf] {
        &self.extra_build_classpath
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Ids of the generators that ran, in order.
    pub fn generators(&self) -> &[String] {
        &self.generators
    }

    /// JSON report of the run, without the generated source.
    pub fn render_report(&self) -> Result<String> {
        let report = Report {
            package: &self.package,
            runtime: self.runtime,
            generators: &self.generators,
            fragments: &self.fragments,
            excluded_resources: &self.excluded_resources,
            extra_build_classpath: &self.extra_build_classpath,
            diagnostics: &self.diagnostics,
        };
        let mut json = serde_json::to_string_pretty(&report).wrap_err("failed to render report")?;
        json.push('\n');
        Ok(json)
    }

    /// All files of the output as relative path and content pairs.
    pub fn files(&self) -> Result<Vec<(PathBuf, String)>> {
        Ok(vec![
            (
                self.initializer.path.clone(),
                self.initializer.content.clone(),
            ),
            (
                PathBuf::from(EXCLUDED_RESOURCES_FILE),
                lines(self.excluded_resources.iter()),
            ),
            (
                PathBuf::from(EXTRA_CLASSPATH_FILE),
                lines(self.extra_build_classpath.iter().map(|p| p.display())),
            ),
            (PathBuf::from(REPORT_FILE), self.render_report()?),
        ])
    }

    /// Write every artifact below `dir`.
    ///
    /// Files are written to a staging directory inside `dir` first and only
    /// moved into place once all of them were written. The staging directory
    /// is removed on both success and failure.
    ///
    /// Returns the paths of the written files.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let files = self.files()?;

        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create output directory {}", dir.display()))?;
        let staging = tempfile::Builder::new()
            .prefix(".aotgen-staging-")
            .tempdir_in(dir)
            .wrap_err("failed to create staging directory")?;

        for (relative, content) in &files {
            let path = staging.path().join(relative);
            write_file(&path, content)
                .wrap_err_with(|| format!("failed to write {}", relative.display()))?;
        }

        if let Some((relative, _)) = files.iter().find(|(relative, _)| dir.join(relative).is_dir()) {
            eyre::bail!("cannot replace directory {} with a file", dir.join(relative).display());
        }

        let mut written = Vec::with_capacity(files.len());
        for (relative, _) in &files {
            let target = dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(staging.path().join(relative), &target)
                .wrap_err_with(|| format!("failed to move {} into place", relative.display()))?;
            tracing::debug!(path = %target.display(), "wrote artifact");
            written.push(target);
        }

        staging.close().wrap_err("failed to remove staging directory")?;
        Ok(written)
    }
}

fn lines<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|item| format!("{}\n", item)).collect()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn output() -> GenerationOutput {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add("known.missing.types", "b::Missing: not found");

        GenerationOutput {
            package: "my_app::aot".to_string(),
            runtime: Runtime::Jit,
            initializer: SourceFile::new("my_app/aot/initializer.rs", "// init\n"),
            fragments: vec![FragmentRecord {
                generator: "known.missing.types".to_string(),
                kind: FragmentKind::Static,
                name: "prepare_known_missing_types".to_string(),
            }],
            excluded_resources: vec!["a.properties".to_string(), "b.properties".to_string()],
            extra_build_classpath: vec![PathBuf::from("deps/a")],
            diagnostics,
            generators: vec!["known.missing.types".to_string()],
        }
    }

    #[test]
    fn test_report_json() {
        let report = output().render_report().unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["package"], "my_app::aot");
        assert_eq!(value["runtime"], "jit");
        assert_eq!(value["fragments"][0]["kind"], "static");
        assert_eq!(value["excluded_resources"][1], "b.properties");
        assert_eq!(value["diagnostics"]["known.missing.types"][0], "b::Missing: not found");
        assert!(value.get("initializer").is_none());
    }

    #[test]
    fn test_write_to() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");

        let written = output().write_to(&out).unwrap();

        assert_eq!(written.len(), 4);
        assert_eq!(
            fs::read_to_string(out.join("my_app/aot/initializer.rs")).unwrap(),
            "// init\n"
        );
        assert_eq!(
            fs::read_to_string(out.join(EXCLUDED_RESOURCES_FILE)).unwrap(),
            "a.properties\nb.properties\n"
        );
        assert_eq!(
            fs::read_to_string(out.join(EXTRA_CLASSPATH_FILE)).unwrap(),
            "deps/a\n"
        );
        assert!(out.join(REPORT_FILE).exists());

        // Only the artifacts remain, no staging directory
        let entries: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".aotgen-staging"))
            .collect();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_write_conflict_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        fs::create_dir(&out).unwrap();
        // A directory where the exclusion list should go blocks the write
        fs::create_dir(out.join(EXCLUDED_RESOURCES_FILE)).unwrap();
        fs::write(out.join(EXCLUDED_RESOURCES_FILE).join("keep"), "").unwrap();

        assert!(output().write_to(&out).is_err());
        assert!(!out.join("my_app").exists());
        assert!(!out.join(REPORT_FILE).exists());

        let staging: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".aotgen-staging"))
            .collect();
        assert!(staging.is_empty());
    }
}
