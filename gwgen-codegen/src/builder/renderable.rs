//! Structured code fragments.

/// A piece of generated code, independent of indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
    /// A single line at the current indentation.
    Line(String),
    /// An empty line.
    Blank,
    /// A header line, an indented body and an optional closing line.
    Block {
        header: String,
        body: Vec<CodeFragment>,
        close: Option<String>,
    },
    /// Fragments one level deeper.
    Indent(Vec<CodeFragment>),
    /// A `//` line comment.
    Comment(String),
}

impl CodeFragment {
    /// Convenience constructor for [`CodeFragment::Line`].
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    /// Convenience constructor for a block closed by `close`.
    pub fn block(header: impl Into<String>, body: Vec<CodeFragment>, close: &str) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close: Some(close.to_string()),
        }
    }
}

/// Types that can be turned into code fragments.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

impl Renderable for CodeFragment {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![self.clone()]
    }
}

impl Renderable for Vec<CodeFragment> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.clone()
    }
}
