//! Alias shim emission.
//!
//! After a split, the legacy package location keeps a file that only
//! re-exports the relocated package's registration entry points, marked
//! deprecated so consumers get a migration signal.

use gwgen_descriptor::PackageIdentity;

use crate::{
    builder::CodeFragment,
    generation::GoImports,
    go_file::GoFile,
    plan::{ArtifactKind, PlannedArtifact},
    symbols::registration_symbols,
};

/// Import name for the relocated package when its identity carries no alias.
pub const DEFAULT_SHIM_ALIAS: &str = "aliased";

/// Name the shim uses to qualify the relocated package's symbols.
pub fn shim_reference_name(target: &PackageIdentity) -> &str {
    target.alias.as_deref().unwrap_or(DEFAULT_SHIM_ALIAS)
}

/// Deprecation notice naming the relocated import path.
pub fn deprecation_notice(target: &PackageIdentity) -> String {
    format!(
        "Deprecated: This package has moved to \"{}\". Use that import path instead.",
        target.path
    )
}

/// Renders the alias shim artifact of a split plan.
#[derive(Debug)]
pub struct AliasShim<'a> {
    artifact: &'a PlannedArtifact,
    target: &'a PackageIdentity,
    register_func_suffix: &'a str,
}

impl<'a> AliasShim<'a> {
    /// Returns `None` unless `artifact` is an alias shim.
    pub fn new(artifact: &'a PlannedArtifact, register_func_suffix: &'a str) -> Option<Self> {
        match &artifact.kind {
            ArtifactKind::AliasShim { target } => {
                Some(Self::with_target(artifact, target, register_func_suffix))
            }
            ArtifactKind::Gateway => None,
        }
    }

    /// Shim re-exporting `target`, taken from an already-matched artifact kind.
    pub(crate) fn with_target(
        artifact: &'a PlannedArtifact,
        target: &'a PackageIdentity,
        register_func_suffix: &'a str,
    ) -> Self {
        Self {
            artifact,
            target,
            register_func_suffix,
        }
    }

    /// `(local, delegate)` pairs, one per registration symbol of every service.
    pub fn aliases(&self) -> Vec<(String, String)> {
        let qualifier = shim_reference_name(self.target);
        self.artifact
            .services
            .iter()
            .flat_map(|svc| registration_symbols(&svc.name, self.register_func_suffix))
            .map(|symbol| {
                let delegate = format!("{qualifier}.{symbol}");
                (symbol, delegate)
            })
            .collect()
    }

    /// Render the shim. The deprecation notice is always present.
    pub fn render(&self) -> String {
        let mut imports = GoImports::new();
        imports.add_aliased(&self.target.path, shim_reference_name(self.target));

        let vars = self
            .aliases()
            .into_iter()
            .map(|(symbol, delegate)| CodeFragment::Line(format!("{symbol} = {delegate}")))
            .collect();

        GoFile::new(&self.artifact.source, &self.artifact.package.name)
            .doc([deprecation_notice(self.target)])
            .imports(imports)
            .add(CodeFragment::block("var (", vars, ")"))
            .render()
    }
}

#[cfg(test)]
mod tests {
    use gwgen_descriptor::Service;

    use super::*;

    fn shim_artifact(target: PackageIdentity, services: &[&str]) -> PlannedArtifact {
        let origin = PackageIdentity::new("example.com/mymodule/foo/bar/v1", "v1gateway");
        PlannedArtifact {
            filename: "foo/bar/v1/example.pb.gw.go".into(),
            package: origin.clone(),
            origin,
            source: "example.proto".into(),
            companion_imports: Vec::new(),
            kind: ArtifactKind::AliasShim { target },
            services: services
                .iter()
                .map(|name| Service {
                    name: name.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn relocated() -> PackageIdentity {
        PackageIdentity::new("example.com/mymodule/foo/bar/v1/v1gateway", "v1gateway")
    }

    #[test]
    fn test_default_reference_name() {
        assert_eq!(shim_reference_name(&relocated()), "aliased");
        assert_eq!(
            shim_reference_name(&relocated().with_alias("moved")),
            "moved"
        );
    }

    #[test]
    fn test_gateway_artifact_is_not_a_shim() {
        let mut artifact = shim_artifact(relocated(), &["ExampleService"]);
        artifact.kind = ArtifactKind::Gateway;
        assert!(AliasShim::new(&artifact, "Handler").is_none());
    }

    #[test]
    fn test_aliases_cover_every_service() {
        let artifact = shim_artifact(relocated(), &["First", "Second"]);
        let shim = AliasShim::new(&artifact, "Handler").unwrap();
        let aliases = shim.aliases();

        assert_eq!(aliases.len(), 8);
        assert_eq!(
            aliases[4],
            (
                "RegisterSecondHandlerServer".to_string(),
                "aliased.RegisterSecondHandlerServer".to_string()
            )
        );
    }

    #[test]
    fn test_explicit_alias_qualifies_symbols() {
        let artifact = shim_artifact(relocated().with_alias("moved"), &["Echo"]);
        let content = AliasShim::new(&artifact, "Handler").unwrap().render();

        assert!(content.contains("moved \"example.com/mymodule/foo/bar/v1/v1gateway\""));
        assert!(content.contains("RegisterEchoHandler = moved.RegisterEchoHandler"));
    }

    #[test]
    fn test_render_alias_shim() {
        let artifact = shim_artifact(relocated(), &["ExampleService"]);
        let content = AliasShim::new(&artifact, "Handler").unwrap().render();

        insta::assert_snapshot!(content, @r#"
        // Code generated by gwgen. DO NOT EDIT.
        // source: example.proto

        /*
        Deprecated: This package has moved to "example.com/mymodule/foo/bar/v1/v1gateway". Use that import path instead.
        */
        package v1gateway

        import (
        	aliased "example.com/mymodule/foo/bar/v1/v1gateway"
        )

        var (
        	RegisterExampleServiceHandlerServer = aliased.RegisterExampleServiceHandlerServer
        	RegisterExampleServiceHandlerClient = aliased.RegisterExampleServiceHandlerClient
        	RegisterExampleServiceHandlerFromEndpoint = aliased.RegisterExampleServiceHandlerFromEndpoint
        	RegisterExampleServiceHandler = aliased.RegisterExampleServiceHandler
        )
        "#);
    }
}
