//! Where reports go.

/// Sink for report content.
///
/// Reports say what they show; an output decides how it looks.
pub trait Output {
    /// A heading introducing the items below it.
    fn heading(&mut self, text: &str);

    /// A labelled value.
    fn field(&mut self, label: &str, value: &str);

    /// A labelled value nested under a heading.
    fn detail(&mut self, label: &str, value: &str);

    /// One entry of a list.
    fn item(&mut self, text: &str);

    /// A file that was written.
    fn file(&mut self, path: &str);

    /// A rule separating blocks, such as previewed files.
    fn rule(&mut self, label: &str);

    /// Text printed as is.
    fn text(&mut self, text: &str);

    fn blank(&mut self);
}

/// A report that can render itself to an output.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Human-readable output on stdout.
#[derive(Debug, Default)]
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for TerminalOutput {
    fn heading(&mut self, text: &str) {
        println!("{}:", text);
    }

    fn field(&mut self, label: &str, value: &str) {
        println!("{}: {}", label, value);
    }

    fn detail(&mut self, label: &str, value: &str) {
        println!("    {}: {}", label, value);
    }

    fn item(&mut self, text: &str) {
        println!("  - {}", text);
    }

    fn file(&mut self, path: &str) {
        println!("  + {}", path);
    }

    fn rule(&mut self, label: &str) {
        println!("── {} ──", label);
    }

    fn text(&mut self, text: &str) {
        println!("{}", text);
    }

    fn blank(&mut self) {
        println!();
    }
}
