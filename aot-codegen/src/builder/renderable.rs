//! Fragment tree for generated source.

/// A piece of generated Rust source.
///
/// Fragments carry no indentation of their own; a [`Block`](Self::Block)
/// indents its body one level when written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
    /// One line of code.
    Line(String),
    /// An empty line, never indented.
    Blank,
    /// A `///` doc line.
    Doc(String),
    /// An opening line, an indented body and a closing line.
    Block {
        open: String,
        body: Vec<CodeFragment>,
        close: String,
    },
}

impl CodeFragment {
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    pub fn blank() -> Self {
        Self::Blank
    }

    pub fn doc(s: impl Into<String>) -> Self {
        Self::Doc(s.into())
    }

    pub fn block(open: impl Into<String>, body: Vec<CodeFragment>, close: impl Into<String>) -> Self {
        Self::Block {
            open: open.into(),
            body,
            close: close.into(),
        }
    }
}

/// Something that describes itself as source fragments.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

impl Renderable for CodeFragment {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![self.clone()]
    }
}

impl<T: Renderable> Renderable for [T] {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.iter().flat_map(Renderable::to_fragments).collect()
    }
}
