//! Companion (RPC-stub) package resolution.
//!
//! A gateway package `<stem>gateway` binds against client/server stubs that
//! live in a sibling directory package named `<stem>grpc`. Generated-code
//! registries lay base message types out under `.../protocolbuffers/go/...`
//! and stubs under `.../grpc/go/...`; a path derived from the former is
//! rewritten to the latter.

use tracing::trace;

use crate::{Error, PackageIdentity, Result, join_path};

/// Name suffix marking a gateway package.
pub const GATEWAY_SUFFIX: &str = "gateway";

/// Name suffix marking an RPC-stub package.
pub const RPC_STUB_SUFFIX: &str = "grpc";

/// Path segments of the base message-type package family.
pub const BASE_TYPE_SUBPATH: &[&str] = &["protocolbuffers", "go"];

/// Path segments of the RPC-stub package family.
pub const RPC_STUB_SUBPATH: &[&str] = &["grpc", "go"];

/// Replaces the first run of whole path segments equal to `from` with `to`.
///
/// Matching is by segment, so `protocolbuffers/gopher` or
/// `myprotocolbuffers/go` are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanionRule {
    from: &'static [&'static str],
    to: &'static [&'static str],
}

impl CompanionRule {
    /// Base message-type layout to RPC-stub layout.
    pub const BASE_TYPE_TO_RPC_STUB: Self = Self {
        from: BASE_TYPE_SUBPATH,
        to: RPC_STUB_SUBPATH,
    };

    pub const fn new(from: &'static [&'static str], to: &'static [&'static str]) -> Self {
        Self { from, to }
    }

    /// Position of the first matching segment run, if any.
    pub fn find(&self, path: &str) -> Option<usize> {
        if self.from.is_empty() {
            return None;
        }
        let segments: Vec<&str> = path.split('/').collect();
        segments
            .windows(self.from.len())
            .position(|window| window == self.from)
    }

    /// Apply the rule once; paths without a match come back unchanged.
    pub fn apply(&self, path: &str) -> String {
        let Some(at) = self.find(path) else {
            return path.to_string();
        };
        let segments: Vec<&str> = path.split('/').collect();
        let mut rewritten: Vec<&str> = Vec::with_capacity(segments.len() + self.to.len());
        rewritten.extend_from_slice(&segments[..at]);
        rewritten.extend_from_slice(self.to);
        rewritten.extend_from_slice(&segments[at + self.from.len()..]);
        rewritten.join("/")
    }
}

/// Derive the RPC-stub package of a gateway package.
///
/// `example.com/foo/v1` named `v1gateway` resolves to
/// `example.com/foo/v1/v1grpc` named `v1grpc`.
///
/// # Errors
///
/// Returns [`Error::InvalidPackageIdentity`] when the name does not end in
/// [`GATEWAY_SUFFIX`].
pub fn resolve_companion(primary: &PackageIdentity) -> Result<PackageIdentity> {
    let Some(stem) = primary.name.strip_suffix(GATEWAY_SUFFIX) else {
        return Err(Error::invalid_package_identity(
            primary.name.clone(),
            GATEWAY_SUFFIX,
        ));
    };

    let name = format!("{stem}{RPC_STUB_SUFFIX}");
    let path = join_path(&primary.path, &name);

    let rule = CompanionRule::BASE_TYPE_TO_RPC_STUB;
    let companion = PackageIdentity::new(rule.apply(&path), rule.apply(&name));

    trace!(
        primary = %primary.path,
        companion = %companion.path,
        "resolved companion package"
    );
    Ok(companion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_simple() {
        let primary = PackageIdentity::new("example.com/mymodule/foo/bar/v1", "v1gateway")
            .with_alias("extalias");
        let companion = resolve_companion(&primary).unwrap();

        assert_eq!(companion.path, "example.com/mymodule/foo/bar/v1/v1grpc");
        assert_eq!(companion.name, "v1grpc");
        assert_eq!(companion.alias, None);
    }

    #[test]
    fn test_resolve_rewrites_base_type_layout() {
        let primary = PackageIdentity::new(
            "buf.build/gen/go/acme/petapis/protocolbuffers/go/pet/v1",
            "petv1gateway",
        );
        let companion = resolve_companion(&primary).unwrap();

        assert_eq!(
            companion.path,
            "buf.build/gen/go/acme/petapis/grpc/go/pet/v1/petv1grpc"
        );
        assert_eq!(companion.name, "petv1grpc");
    }

    #[test]
    fn test_resolve_rewrites_only_first_occurrence() {
        let primary = PackageIdentity::new("x/protocolbuffers/go/y/protocolbuffers/go", "ygateway");
        let companion = resolve_companion(&primary).unwrap();

        assert_eq!(companion.path, "x/grpc/go/y/protocolbuffers/go/ygrpc");
    }

    #[test]
    fn test_resolve_ignores_partial_segment_matches() {
        let primary = PackageIdentity::new("x/myprotocolbuffers/gopher", "v1gateway");
        let companion = resolve_companion(&primary).unwrap();

        assert_eq!(companion.path, "x/myprotocolbuffers/gopher/v1grpc");
    }

    #[test]
    fn test_resolve_rejects_non_gateway_name() {
        let primary = PackageIdentity::new("example.com/foo/v1", "example_pb");
        let err = resolve_companion(&primary).unwrap_err();

        assert!(matches!(
            *err,
            Error::InvalidPackageIdentity { ref name, .. } if name == "example_pb"
        ));
    }

    #[test]
    fn test_resolved_name_swaps_marker() {
        for name in ["gateway", "v1gateway", "gatewaygateway", "pet_v2gateway"] {
            let primary = PackageIdentity::new("example.com/p", name);
            let companion = resolve_companion(&primary).unwrap();

            assert!(!companion.name.ends_with(GATEWAY_SUFFIX), "{name}");
            assert!(companion.name.ends_with(RPC_STUB_SUFFIX), "{name}");
        }
    }

    #[test]
    fn test_rule_without_match_is_identity() {
        let rule = CompanionRule::BASE_TYPE_TO_RPC_STUB;
        assert_eq!(rule.find("a/b/c"), None);
        assert_eq!(rule.apply("a/b/c"), "a/b/c");
    }

    #[test]
    fn test_custom_rule() {
        let rule = CompanionRule::new(&["types"], &["stubs", "v2"]);
        assert_eq!(rule.apply("acme/types/pet"), "acme/stubs/v2/pet");
    }
}
