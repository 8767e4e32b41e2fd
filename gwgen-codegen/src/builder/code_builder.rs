//! Indentation-tracking text buffer that Go files are emitted into.

use super::{CodeFragment, Indent, Renderable};

/// Accumulates Go source line by line, either directly through the `push_*`
/// methods or by emitting [`Renderable`] nodes.
///
/// # Example
///
/// ```
/// use gwgen_codegen::builder::{CodeBuilder, CodeFragment};
///
/// let mut builder = CodeBuilder::go();
/// builder.push_line("package v1gateway").push_blank();
/// builder.emit(&vec![CodeFragment::block(
///     "func init() {",
///     vec![CodeFragment::line("register()")],
///     "}",
/// )]);
///
/// assert_eq!(
///     builder.build(),
///     "package v1gateway\n\nfunc init() {\n\tregister()\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Create a new CodeBuilder with tab indentation (Go default).
    pub fn go() -> Self {
        Self::new(Indent::GO)
    }

    /// Add a line at the current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Increase indentation level.
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level, stopping at zero.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a `//` comment line.
    pub fn push_comment(&mut self, text: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str("// ");
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self
    }

    /// Emit every fragment of a node.
    pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
        for fragment in node.to_fragments() {
            self.apply_fragment(fragment);
        }
        self
    }

    /// Apply a single code fragment.
    pub fn apply_fragment(&mut self, fragment: CodeFragment) {
        match fragment {
            CodeFragment::Line(s) => {
                self.push_line(&s);
            }
            CodeFragment::Blank => {
                self.push_blank();
            }
            CodeFragment::Block {
                header,
                body,
                close,
            } => {
                self.push_line(&header);
                self.push_indent();
                for f in body {
                    self.apply_fragment(f);
                }
                self.push_dedent();
                if let Some(c) = close {
                    self.push_line(&c);
                }
            }
            CodeFragment::Indent(fragments) => {
                self.push_indent();
                for f in fragments {
                    self.apply_fragment(f);
                }
                self.push_dedent();
            }
            CodeFragment::Comment(text) => {
                self.push_comment(&text);
            }
        }
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::go()
    }
}
