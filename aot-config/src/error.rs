use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result of reading a run file. The error is boxed, it carries the source text.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// The run file text errors point into.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Wrap a toml error, labelled where toml located it.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    pub fn invalid_package_error(
        &self,
        package: impl Into<String>,
        reason: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidPackage {
            src: self.named_source(),
            span,
            package: package.into(),
            reason: reason.into(),
        })
    }

    pub fn unsupported_value_error(
        &self,
        key: impl Into<String>,
        kind: &'static str,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::UnsupportedValue {
            src: self.named_source(),
            span,
            key: key.into(),
            kind,
        })
    }

    pub fn duplicate_generator_error(
        &self,
        id: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicateGenerator {
            src: self.named_source(),
            span,
            id: id.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("create an aot.toml with an [aot] section naming the target package"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse aot.toml")]
    #[diagnostic(code(aotgen::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid package '{package}'")]
    #[diagnostic(
        code(aotgen::invalid_package),
        help("{reason}. Packages are `::`-separated Rust identifiers, e.g. 'my_app::aot'")
    )]
    InvalidPackage {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid package")]
        span: Option<SourceSpan>,
        package: String,
        reason: String,
    },

    #[error("option '{key}' has an unsupported {kind} value")]
    #[diagnostic(
        code(aotgen::unsupported_value),
        help("option values must be strings, numbers, booleans, or arrays of those; nested tables are flattened into dotted keys")
    )]
    UnsupportedValue {
        #[source_code]
        src: NamedSource<String>,
        #[label("unsupported value")]
        span: Option<SourceSpan>,
        key: String,
        kind: &'static str,
    },

    #[error("generator '{id}' is listed more than once")]
    #[diagnostic(
        code(aotgen::duplicate_generator),
        help("each generator runs at most once per run; remove the duplicate entry")
    )]
    DuplicateGenerator {
        #[source_code]
        src: NamedSource<String>,
        #[label("listed again here")]
        span: Option<SourceSpan>,
        id: String,
    },
}
