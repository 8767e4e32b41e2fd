//! GoFile abstraction for structured Go file generation.
//!
//! Lays out a generated Go source file: header comments, package
//! documentation, package clause, imports and body.

use gwgen_core::GENERATED_HEADER;

use crate::{
    builder::{CodeBuilder, CodeFragment, Indent, Renderable},
    generation::GoImports,
};

/// A structured representation of a generated Go file.
///
/// # Example
///
/// ```ignore
/// let file = GoFile::new("example.proto", "v1gateway")
///     .doc(["Package v1gateway is a reverse proxy."])
///     .imports(imports)
///     .add(register_fn)
///     .render();
/// ```
#[derive(Debug, Default)]
pub struct GoFile {
    source: String,
    package: String,
    doc: Vec<String>,
    imports: GoImports,
    body: Vec<Vec<CodeFragment>>,
}

impl GoFile {
    /// Create a file generated from `source` declaring `package`.
    pub fn new(source: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    /// Set the package documentation, rendered as a `/* */` block.
    pub fn doc(mut self, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.doc = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Set the imports.
    pub fn imports(mut self, imports: GoImports) -> Self {
        self.imports = imports;
        self
    }

    /// Add a body element (any Renderable).
    #[allow(clippy::should_implement_trait)]
    pub fn add<R: Renderable>(mut self, node: R) -> Self {
        self.body.push(node.to_fragments());
        self
    }

    /// Add multiple body elements.
    pub fn add_all<R: Renderable>(mut self, nodes: impl IntoIterator<Item = R>) -> Self {
        for node in nodes {
            self.body.push(node.to_fragments());
        }
        self
    }

    /// Render the file with gofmt indentation.
    pub fn render(&self) -> String {
        let mut builder = CodeBuilder::new(Indent::GO);

        builder.push_line(GENERATED_HEADER);
        builder.push_line(&format!("// source: {}", self.source));
        builder.push_blank();

        if !self.doc.is_empty() {
            builder.push_line("/*");
            for line in &self.doc {
                builder.push_line(line);
            }
            builder.push_line("*/");
        }
        builder.push_line(&format!("package {}", self.package));

        if !self.imports.is_empty() {
            builder.push_blank();
            builder.emit(&self.imports);
        }

        for fragments in &self.body {
            builder.push_blank();
            for fragment in fragments {
                builder.apply_fragment(fragment.clone());
            }
        }

        builder.build()
    }
}
