//! Indented text output.

use super::{CodeFragment, Renderable};

const RUST_INDENT: &str = "    ";

/// Writes fragments as rustfmt-style text.
///
/// ```
/// use aotgen_codegen::builder::{CodeBuilder, CodeFragment};
///
/// let mut builder = CodeBuilder::rust();
/// builder.emit(&CodeFragment::block(
///     "fn main() {",
///     vec![CodeFragment::line("aot::static_init();")],
///     "}",
/// ));
/// assert_eq!(builder.build(), "fn main() {\n    aot::static_init();\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    buf: String,
    depth: usize,
    unit: &'static str,
}

impl CodeBuilder {
    /// A builder indenting with four spaces.
    pub fn rust() -> Self {
        Self {
            buf: String::new(),
            depth: 0,
            unit: RUST_INDENT,
        }
    }

    /// Write one line at the current depth.
    pub fn line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.buf.push_str(self.unit);
        }
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Write `open` and indent what follows.
    pub fn open(&mut self, open: &str) -> &mut Self {
        self.line(open);
        self.depth += 1;
        self
    }

    /// Dedent and write `close`.
    pub fn close(&mut self, close: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(close)
    }

    pub fn write_fragment(&mut self, fragment: &CodeFragment) -> &mut Self {
        match fragment {
            CodeFragment::Line(s) => self.line(s),
            CodeFragment::Blank => self.blank(),
            CodeFragment::Doc(s) if s.is_empty() => self.line("///"),
            CodeFragment::Doc(s) => self.line(&format!("/// {}", s)),
            CodeFragment::Block { open, body, close } => {
                self.open(open);
                for inner in body {
                    self.write_fragment(inner);
                }
                self.close(close)
            }
        }
    }

    /// Write everything `node` renders to.
    pub fn emit(&mut self, node: &(impl Renderable + ?Sized)) -> &mut Self {
        for fragment in node.to_fragments() {
            self.write_fragment(&fragment);
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn build(self) -> String {
        self.buf
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::rust()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        let mut builder = CodeBuilder::rust();
        builder.emit(&CodeFragment::block(
            "pub fn static_init() {",
            vec![CodeFragment::block(
                "INIT.call_once(|| {",
                vec![CodeFragment::line("seed();")],
                "});",
            )],
            "}",
        ));

        assert_eq!(
            builder.as_str(),
            "pub fn static_init() {\n    INIT.call_once(|| {\n        seed();\n    });\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_are_not_indented() {
        let mut builder = CodeBuilder::rust();
        builder
            .open("mod a {")
            .line("x();")
            .blank()
            .line("y();")
            .close("}");
        assert_eq!(builder.build(), "mod a {\n    x();\n\n    y();\n}\n");
    }

    #[test]
    fn test_doc_lines() {
        let fragments = [
            CodeFragment::doc("Summary."),
            CodeFragment::doc(""),
            CodeFragment::doc("Details."),
        ];
        let mut builder = CodeBuilder::rust();
        builder.emit(&fragments[..]);
        assert_eq!(builder.build(), "/// Summary.\n///\n/// Details.\n");
    }

    #[test]
    fn test_close_never_underflows() {
        let mut builder = CodeBuilder::rust();
        builder.close("}").line("x");
        assert_eq!(builder.build(), "}\nx\n");
    }
}
