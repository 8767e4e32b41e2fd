//! Go import collection.

use indexmap::IndexMap;

use crate::builder::{CodeFragment, Renderable};

/// Tracks Go imports and deduplicates them by path.
///
/// Renders gofmt-style: standard library first, then a blank line, then
/// everything else, each group sorted by path.
///
/// # Example
///
/// ```
/// use gwgen_codegen::generation::GoImports;
///
/// let mut imports = GoImports::new();
/// imports.add("net/http");
/// imports.add_aliased("example.com/foo/v1", "extalias");
/// imports.add("context");
///
/// assert!(imports.has("context"));
/// assert_eq!(imports.alias_of("example.com/foo/v1"), Some("extalias"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GoImports {
    /// Import path -> explicit import name
    imports: IndexMap<String, Option<String>>,
}

impl GoImports {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a package under its inferred name.
    pub fn add(&mut self, path: &str) {
        self.imports.entry(path.to_string()).or_default();
    }

    /// Import a package under `alias`.
    ///
    /// An alias equal to the last path segment is dropped. An explicit alias
    /// replaces a previously inferred one but never another explicit alias.
    pub fn add_aliased(&mut self, path: &str, alias: &str) {
        let inferred = path.rsplit('/').next().unwrap_or_default();
        let alias = (alias != inferred).then(|| alias.to_string());
        let entry = self.imports.entry(path.to_string()).or_default();
        if entry.is_none() {
            *entry = alias;
        }
    }

    /// Check if a path is imported.
    pub fn has(&self, path: &str) -> bool {
        self.imports.contains_key(path)
    }

    /// Explicit import name of a path, if any.
    pub fn alias_of(&self, path: &str) -> Option<&str> {
        self.imports.get(path).and_then(|alias| alias.as_deref())
    }

    /// Iterate over all imports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.imports
            .iter()
            .map(|(path, alias)| (path.as_str(), alias.as_deref()))
    }

    /// Check if the collector is empty.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Get the number of imported paths.
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    fn group(&self, standard: bool) -> Vec<String> {
        let mut lines: Vec<(&str, String)> = self
            .iter()
            .filter(|(path, _)| is_standard(path) == standard)
            .map(|(path, alias)| match alias {
                Some(alias) => (path, format!("{alias} \"{path}\"")),
                None => (path, format!("\"{path}\"")),
            })
            .collect();
        lines.sort_by(|a, b| a.0.cmp(b.0));
        lines.into_iter().map(|(_, line)| line).collect()
    }
}

/// Standard library paths have no dot in their first segment.
fn is_standard(path: &str) -> bool {
    !path.split('/').next().unwrap_or_default().contains('.')
}

impl Renderable for GoImports {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        if self.is_empty() {
            return Vec::new();
        }

        let standard = self.group(true);
        let external = self.group(false);

        let mut body: Vec<CodeFragment> = standard.into_iter().map(CodeFragment::Line).collect();
        if !body.is_empty() && !external.is_empty() {
            body.push(CodeFragment::Blank);
        }
        body.extend(external.into_iter().map(CodeFragment::Line));

        vec![CodeFragment::block("import (", body, ")")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CodeBuilder;

    #[test]
    fn test_dedup_by_path() {
        let mut imports = GoImports::new();
        imports.add("context");
        imports.add("context");
        imports.add_aliased("example.com/foo/v1/v1grpc", "v1grpc");

        assert_eq!(imports.len(), 2);
        assert_eq!(imports.alias_of("example.com/foo/v1/v1grpc"), None);
    }

    #[test]
    fn test_explicit_alias_wins_once() {
        let mut imports = GoImports::new();
        imports.add("example.com/foo/v1");
        imports.add_aliased("example.com/foo/v1", "extalias");
        imports.add_aliased("example.com/foo/v1", "other");

        assert_eq!(imports.alias_of("example.com/foo/v1"), Some("extalias"));
    }

    #[test]
    fn test_render_groups() {
        let mut imports = GoImports::new();
        imports.add("google.golang.org/grpc");
        imports.add("net/http");
        imports.add_aliased("example.com/foo/v1", "extalias");
        imports.add("context");

        let mut builder = CodeBuilder::go();
        builder.emit(&imports);

        assert_eq!(
            builder.build(),
            "import (\n\t\"context\"\n\t\"net/http\"\n\n\textalias \"example.com/foo/v1\"\n\t\"google.golang.org/grpc\"\n)\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert!(GoImports::new().to_fragments().is_empty());
    }
}
