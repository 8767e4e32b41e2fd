//! Run-wide generation state.

use indexmap::IndexMap;
use tracing::trace;

use crate::PackageIdentity;

/// Mode flags and companion imports for one generation run.
///
/// Configure the flags first, then plan files. Companion imports are
/// append-only and keyed by the primary package path; duplicates are kept
/// and left to the renderer.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    separate_package: bool,
    standalone: bool,
    omit_package_doc: bool,
    companion_imports: IndexMap<String, Vec<String>>,
}

impl Registry {
    /// Create a registry with every mode disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate gateways in a package separate from their RPC stubs.
    pub fn set_separate_package(&mut self, enabled: bool) {
        self.separate_package = enabled;
    }

    /// Move generated packages into their own subdirectory.
    pub fn set_standalone(&mut self, enabled: bool) {
        self.standalone = enabled;
    }

    /// Suppress ordinary package documentation.
    pub fn set_omit_package_doc(&mut self, enabled: bool) {
        self.omit_package_doc = enabled;
    }

    pub fn separate_package(&self) -> bool {
        self.separate_package
    }

    pub fn standalone(&self) -> bool {
        self.standalone
    }

    pub fn omit_package_doc(&self) -> bool {
        self.omit_package_doc
    }

    /// Both modes needed for a relocated package plus alias shim.
    pub fn split_enabled(&self) -> bool {
        self.separate_package && self.standalone
    }

    /// Record that code in `primary` must import `companion_path`.
    ///
    /// No-op unless separate-package mode is enabled.
    pub fn record_companion_import(
        &mut self,
        primary: &PackageIdentity,
        companion_path: impl Into<String>,
    ) {
        if !self.separate_package {
            return;
        }
        let companion_path = companion_path.into();
        trace!(primary = %primary.path, companion = %companion_path, "recorded companion import");
        self.companion_imports
            .entry(primary.path.clone())
            .or_default()
            .push(companion_path);
    }

    /// Companion imports recorded for `primary`, in recording order.
    pub fn companion_imports_for(&self, primary: &PackageIdentity) -> &[String] {
        if !self.separate_package {
            return &[];
        }
        self.companion_imports
            .get(&primary.path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of packages with recorded companion imports.
    pub fn package_count(&self) -> usize {
        self.companion_imports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway_pkg() -> PackageIdentity {
        PackageIdentity::new("example.com/foo/v1", "v1gateway")
    }

    #[test]
    fn test_record_requires_separate_package() {
        let mut reg = Registry::new();
        reg.record_companion_import(&gateway_pkg(), "example.com/foo/v1/v1grpc");

        assert!(reg.companion_imports_for(&gateway_pkg()).is_empty());
        assert_eq!(reg.package_count(), 0);
    }

    #[test]
    fn test_record_and_read_back() {
        let mut reg = Registry::new();
        reg.set_separate_package(true);
        reg.record_companion_import(&gateway_pkg(), "example.com/foo/v1/v1grpc");
        reg.record_companion_import(&gateway_pkg(), "example.com/foo/v1/v1grpc");

        assert_eq!(
            reg.companion_imports_for(&gateway_pkg()),
            ["example.com/foo/v1/v1grpc", "example.com/foo/v1/v1grpc"]
        );
    }

    #[test]
    fn test_keyed_by_path_only() {
        let mut reg = Registry::new();
        reg.set_separate_package(true);
        reg.record_companion_import(&gateway_pkg(), "a");

        let same_path = gateway_pkg().with_alias("other");
        assert_eq!(reg.companion_imports_for(&same_path), ["a"]);

        let other = PackageIdentity::new("example.com/bar", "bargateway");
        assert!(reg.companion_imports_for(&other).is_empty());
    }

    #[test]
    fn test_read_hidden_when_mode_disabled() {
        let mut reg = Registry::new();
        reg.set_separate_package(true);
        reg.record_companion_import(&gateway_pkg(), "a");
        reg.set_separate_package(false);

        assert!(reg.companion_imports_for(&gateway_pkg()).is_empty());
    }

    #[test]
    fn test_setters_are_idempotent() {
        let mut reg = Registry::new();
        reg.set_standalone(true);
        reg.set_standalone(true);
        reg.set_omit_package_doc(true);

        assert!(reg.standalone());
        assert!(reg.omit_package_doc());
        assert!(!reg.split_enabled());

        reg.set_separate_package(true);
        assert!(reg.split_enabled());
    }
}
