//! Initialization fragments contributed by generators.

use serde::Serialize;

use crate::builder::{CodeFragment, Renderable};

/// Name of the runtime type instance fragments receive.
pub const APPLICATION_BUILDER: &str = "ApplicationBuilder";

/// When a fragment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    /// Once per process, before any application instance exists.
    Static,
    /// Once per constructed application instance.
    Instance,
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FragmentKind::Static => write!(f, "static"),
            FragmentKind::Instance => write!(f, "instance"),
        }
    }
}

/// A named piece of initialization code.
///
/// A fragment becomes one private function of the aggregate initializer. Its
/// `uses` are import paths merged into the file header.
///
/// # Example
///
/// ```
/// use aotgen_codegen::pipeline::InitFragment;
///
/// let fragment = InitFragment::new("warm_cache")
///     .doc("Fills the lookup cache.")
///     .uses("aotgen_runtime::StaticOptimizations")
///     .line("StaticOptimizations::warm();");
///
/// assert_eq!(fragment.name(), "warm_cache");
/// assert_eq!(fragment.imports(), ["aotgen_runtime::StaticOptimizations"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitFragment {
    name: String,
    doc: Option<String>,
    uses: Vec<String>,
    body: Vec<CodeFragment>,
}

impl InitFragment {
    /// Create an empty fragment rendered as function `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            uses: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Set the doc comment of the function.
    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = Some(text.into());
        self
    }

    /// Add an import path.
    pub fn uses(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !self.uses.contains(&path) {
            self.uses.push(path);
        }
        self
    }

    /// Append a body line.
    pub fn line(self, s: impl Into<String>) -> Self {
        self.fragment(CodeFragment::line(s))
    }

    /// Append body lines.
    pub fn lines(mut self, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.body.extend(lines.into_iter().map(CodeFragment::line));
        self
    }

    /// Append an arbitrary body fragment.
    pub fn fragment(mut self, fragment: CodeFragment) -> Self {
        self.body.push(fragment);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Import paths in the order they were added.
    pub fn imports(&self) -> &[String] {
        &self.uses
    }

    pub fn body(&self) -> &[CodeFragment] {
        &self.body
    }

    /// View this fragment as a function of the given kind.
    pub fn function(&self, kind: FragmentKind) -> InitFunction<'_> {
        InitFunction {
            fragment: self,
            kind,
        }
    }
}

/// A fragment bound to its kind, renderable as a function definition.
#[derive(Debug, Clone, Copy)]
pub struct InitFunction<'a> {
    fragment: &'a InitFragment,
    kind: FragmentKind,
}

impl InitFunction<'_> {
    /// The statement that invokes this function from the aggregate entry point.
    pub fn call(&self) -> String {
        match self.kind {
            FragmentKind::Static => format!("{}();", self.fragment.name),
            FragmentKind::Instance => format!("{}(builder);", self.fragment.name),
        }
    }

    fn signature(&self) -> String {
        match self.kind {
            FragmentKind::Static => format!("fn {}() {{", self.fragment.name),
            FragmentKind::Instance => format!(
                "fn {}(builder: &mut {}) {{",
                self.fragment.name, APPLICATION_BUILDER
            ),
        }
    }
}

impl Renderable for InitFunction<'_> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.fragment.doc {
            fragments.extend(doc.lines().map(CodeFragment::doc));
        }
        fragments.push(CodeFragment::block(
            self.signature(),
            self.fragment.body.clone(),
            "}",
        ));
        fragments
    }
}

/// Render a string as a Rust string literal.
pub fn string_literal(s: &str) -> String {
    format!("{:?}", s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CodeBuilder;

    fn render(function: InitFunction<'_>) -> String {
        let mut builder = CodeBuilder::rust();
        builder.emit(&function);
        builder.build()
    }

    #[test]
    fn test_static_function() {
        let fragment = InitFragment::new("seed")
            .doc("Seeds things.")
            .line("let x = 1;");

        assert_eq!(
            render(fragment.function(FragmentKind::Static)),
            "/// Seeds things.\nfn seed() {\n    let x = 1;\n}\n"
        );
        assert_eq!(fragment.function(FragmentKind::Static).call(), "seed();");
    }

    #[test]
    fn test_instance_function() {
        let fragment = InitFragment::new("preload").line("builder.preload(\"db\", \"app::Db\");");

        assert_eq!(
            render(fragment.function(FragmentKind::Instance)),
            "fn preload(builder: &mut ApplicationBuilder) {\n    builder.preload(\"db\", \"app::Db\");\n}\n"
        );
        assert_eq!(
            fragment.function(FragmentKind::Instance).call(),
            "preload(builder);"
        );
    }

    #[test]
    fn test_empty_body_renders() {
        let fragment = InitFragment::new("nothing");
        assert_eq!(
            render(fragment.function(FragmentKind::Static)),
            "fn nothing() {\n}\n"
        );
    }

    #[test]
    fn test_uses_deduplicated() {
        let fragment = InitFragment::new("f")
            .uses("std::collections::HashSet")
            .uses("std::collections::HashSet");
        assert_eq!(fragment.imports().len(), 1);
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("a::B"), "\"a::B\"");
        assert_eq!(string_literal("say \"hi\"\\"), r#""say \"hi\"\\""#);
    }
}
