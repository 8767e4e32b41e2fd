//! Package identities of generated Go packages.

use serde::{Deserialize, Serialize};

/// Where a generated package lives and how code refers to it.
///
/// `path` is the import path, `name` the package clause identifier, and
/// `alias` an optional import name overriding `name` at reference sites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl PackageIdentity {
    /// Create an identity without an alias.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            alias: None,
        }
    }

    /// Set the reference alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The identifier used to qualify symbols of this package.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Identity of this package moved into a subdirectory named after itself.
    ///
    /// `example.com/foo/v1` named `v1gateway` becomes
    /// `example.com/foo/v1/v1gateway`, keeping the name and dropping the alias.
    pub fn relocated(&self) -> Self {
        Self::new(join_path(&self.path, &self.name), self.name.clone())
    }

    /// Whether both identities point at the same import path.
    pub fn same_package(&self, other: &PackageIdentity) -> bool {
        self.path == other.path
    }
}

/// Join a slash-separated directory and a final segment.
///
/// Empty segments and `.` are dropped, so `"a//b/"` joined with `"c"` is `"a/b/c"`.
pub fn join_path(dir: &str, segment: &str) -> String {
    dir.split('/')
        .chain(segment.split('/'))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_name_prefers_alias() {
        let pkg = PackageIdentity::new("example.com/foo/v1", "v1gateway");
        assert_eq!(pkg.reference_name(), "v1gateway");

        let aliased = pkg.with_alias("extalias");
        assert_eq!(aliased.reference_name(), "extalias");
    }

    #[test]
    fn test_relocated() {
        let pkg = PackageIdentity::new("example.com/mymodule/foo/bar/v1", "v1gateway")
            .with_alias("extalias");
        let moved = pkg.relocated();

        assert_eq!(moved.path, "example.com/mymodule/foo/bar/v1/v1gateway");
        assert_eq!(moved.name, "v1gateway");
        assert_eq!(moved.alias, None);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("a/b", "c"), "a/b/c");
        assert_eq!(join_path("a//b/", "c"), "a/b/c");
        assert_eq!(join_path("", "c"), "c");
        assert_eq!(join_path("./a", "c"), "a/c");
    }
}
