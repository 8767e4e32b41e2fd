//! Go function builder.

use crate::builder::{CodeFragment, Renderable};

/// A parameter in a Go function.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Builder for top-level Go functions.
#[derive(Debug, Clone)]
pub struct GoFunc {
    name: String,
    doc: Vec<String>,
    params: Vec<Param>,
    returns: Option<String>,
    body: Vec<CodeFragment>,
}

impl GoFunc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: Vec::new(),
            params: Vec::new(),
            returns: None,
            body: Vec::new(),
        }
    }

    /// Add a `//` doc comment line.
    pub fn doc(mut self, line: impl Into<String>) -> Self {
        self.doc.push(line.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    /// Result list, written verbatim (e.g. `error` or `(err error)`).
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.returns = Some(ty.into());
        self
    }

    /// Add a line to the function body.
    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(CodeFragment::Line(line.into()));
        self
    }

    /// Add structured content to the function body.
    pub fn body(mut self, node: impl Renderable) -> Self {
        self.body.extend(node.to_fragments());
        self
    }

    fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| format!("{} {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", ");

        match &self.returns {
            Some(ret) => format!("func {}({}) {} {{", self.name, params, ret),
            None => format!("func {}({}) {{", self.name, params),
        }
    }
}

impl Renderable for GoFunc {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments: Vec<CodeFragment> =
            self.doc.iter().cloned().map(CodeFragment::Comment).collect();
        fragments.push(CodeFragment::block(
            self.signature(),
            self.body.clone(),
            "}",
        ));
        fragments
    }
}
