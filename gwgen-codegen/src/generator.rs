//! Generation run orchestration.
//!
//! A run has three phases: plan every file (recording companion imports),
//! refresh the companion imports of every planned artifact, then render.
//! Failures are scoped to the file that caused them.

use std::path::{Path, PathBuf};

use gwgen_core::GeneratedFile;
use gwgen_descriptor::{Error, File, PackageIdentity, Registry};
use tracing::{debug, info, warn};

use crate::{
    gateway::GatewayFile,
    plan::{ArtifactKind, ArtifactPlanner, Plan, PlannedArtifact},
    shim::AliasShim,
};

/// Default suffix of the registration entry points.
pub const DEFAULT_REGISTER_FUNC_SUFFIX: &str = "Handler";

/// Options that affect rendering but not planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Inserted between service name and style, e.g. `RegisterEchoHandlerClient`.
    pub register_func_suffix: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            register_func_suffix: DEFAULT_REGISTER_FUNC_SUFFIX.to_string(),
        }
    }
}

/// A rendered output file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    /// Output path relative to the output directory.
    pub filename: String,
    pub package: PackageIdentity,
    /// Descriptor file the artifact was generated from.
    pub source: String,
    pub is_alias_shim: bool,
    pub content: String,
}

impl GeneratedFile for RenderedArtifact {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(&self.filename)
    }

    fn render(&self) -> String {
        self.content.clone()
    }
}

/// A file that could not be planned.
#[derive(Debug)]
pub struct FileFailure {
    /// Descriptor file name.
    pub file: String,
    pub error: Box<Error>,
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct Generation {
    /// Plans of the files that succeeded, in input order.
    pub plans: Vec<Plan>,
    /// Rendered artifacts in file order, primary before alias shim.
    pub artifacts: Vec<RenderedArtifact>,
    pub failures: Vec<FileFailure>,
}

impl Generation {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Artifacts generated from `file`.
    pub fn artifacts_for<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a RenderedArtifact> {
        self.artifacts.iter().filter(move |a| a.source == file)
    }
}

/// Plans and renders descriptor files.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    planner: ArtifactPlanner,
    options: GeneratorOptions,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            planner: ArtifactPlanner::new(),
            options,
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Plan every file, then refresh companion imports across all plans.
    pub fn plan_all(&self, registry: &mut Registry, files: &[File]) -> (Vec<Plan>, Vec<FileFailure>) {
        let mut plans = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        for file in files {
            match self.planner.plan(file, registry) {
                Ok(plan) => plans.push(plan),
                Err(error) => {
                    warn!(file = %file.name, error = %error, "failed to plan file");
                    failures.push(FileFailure {
                        file: file.name.clone(),
                        error,
                    });
                }
            }
        }

        for artifact in plans.iter_mut().flat_map(|plan| plan.artifacts.iter_mut()) {
            artifact.refresh_companion_imports(registry);
        }

        (plans, failures)
    }

    /// Render one planned artifact.
    pub fn render(&self, registry: &Registry, artifact: &PlannedArtifact) -> RenderedArtifact {
        let suffix = self.options.register_func_suffix.as_str();
        let content = match &artifact.kind {
            ArtifactKind::Gateway => GatewayFile::for_gateway(artifact, suffix)
                .omit_package_doc(registry.omit_package_doc())
                .render(),
            ArtifactKind::AliasShim { target } => {
                AliasShim::with_target(artifact, target, suffix).render()
            }
        };

        debug!(
            filename = %artifact.filename,
            package = %artifact.package.path,
            alias_shim = artifact.is_alias_shim(),
            "rendered artifact"
        );

        RenderedArtifact {
            filename: artifact.filename.clone(),
            package: artifact.package.clone(),
            source: artifact.source.clone(),
            is_alias_shim: artifact.is_alias_shim(),
            content,
        }
    }

    /// Run all three phases over `files`.
    pub fn generate(&self, registry: &mut Registry, files: &[File]) -> Generation {
        let (plans, failures) = self.plan_all(registry, files);

        let artifacts: Vec<_> = plans
            .iter()
            .flat_map(|plan| plan.artifacts.iter())
            .map(|artifact| self.render(registry, artifact))
            .collect();

        info!(
            files = files.len(),
            artifacts = artifacts.len(),
            failures = failures.len(),
            "generation finished"
        );

        Generation {
            plans,
            artifacts,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use gwgen_descriptor::{Binding, MessageRef, Method, Service};
    use tempfile::TempDir;

    use super::*;

    fn file(name: &str, path: &str, pkg: &str, prefix: &str) -> File {
        File {
            name: name.into(),
            package: PackageIdentity::new(path, pkg),
            generated_filename_prefix: prefix.into(),
            services: vec![Service {
                name: "EchoService".into(),
                methods: vec![Method {
                    name: "Echo".into(),
                    input: MessageRef::local("EchoRequest"),
                    output: MessageRef::local("EchoResponse"),
                    bindings: vec![Binding {
                        http_method: "POST".into(),
                        path_template: "/v1/echo".into(),
                        body: Some("*".into()),
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_suffix() {
        assert_eq!(Generator::default().options().register_func_suffix, "Handler");
    }

    #[test]
    fn test_generate_single() {
        let files = [file("echo.proto", "example.com/echo/v1", "v1gateway", "echo/v1/echo")];
        let mut reg = Registry::new();

        let generation = Generator::default().generate(&mut reg, &files);

        assert!(generation.is_success());
        assert_eq!(generation.artifacts.len(), 1);
        assert_eq!(generation.artifacts[0].filename, "echo/v1/echo.pb.gw.go");
        assert!(generation.artifacts[0].content.contains("package v1gateway"));
    }

    #[test]
    fn test_failure_is_scoped_to_file() {
        let files = [
            file("bad.proto", "example.com/bad/v1", "badpb", "bad/v1/bad"),
            file("echo.proto", "example.com/echo/v1", "v1gateway", "echo/v1/echo"),
        ];
        let mut reg = Registry::new();
        reg.set_separate_package(true);
        reg.set_standalone(true);

        let generation = Generator::default().generate(&mut reg, &files);

        assert_eq!(generation.failures.len(), 1);
        assert_eq!(generation.failures[0].file, "bad.proto");
        assert!(matches!(
            *generation.failures[0].error,
            Error::InvalidPackageIdentity { .. }
        ));
        assert_eq!(generation.artifacts_for("echo.proto").count(), 2);
        assert_eq!(generation.artifacts_for("bad.proto").count(), 0);
        assert_eq!(reg.package_count(), 1);
    }

    #[test]
    fn test_refresh_shares_imports_within_package() {
        let mut second = file("b.proto", "example.com/echo/v1", "v1gateway", "echo/v1/b");
        second.services[0].name = "OtherService".into();
        let files = [
            file("a.proto", "example.com/echo/v1", "v1gateway", "echo/v1/a"),
            second,
        ];
        let mut reg = Registry::new();
        reg.set_separate_package(true);

        let (plans, failures) = Generator::default().plan_all(&mut reg, &files);

        assert!(failures.is_empty());
        assert_eq!(
            plans[0].artifacts[0].companion_imports,
            plans[1].artifacts[0].companion_imports
        );
        assert_eq!(
            plans[0].artifacts[0].companion_imports,
            vec!["example.com/echo/v1/v1grpc"]
        );
    }

    #[test]
    fn test_rendered_artifact_is_generated_file() {
        let temp = TempDir::new().unwrap();
        let files = [file("echo.proto", "example.com/echo/v1", "v1gateway", "echo/v1/echo")];
        let mut reg = Registry::new();

        let generation = Generator::default().generate(&mut reg, &files);
        let artifact = &generation.artifacts[0];
        artifact.write(temp.path()).unwrap();

        let written = std::fs::read_to_string(temp.path().join("echo/v1/echo.pb.gw.go")).unwrap();
        assert_eq!(written, artifact.content);
        assert!(written.starts_with(gwgen_core::GENERATED_HEADER));
    }

    #[test]
    fn test_render_follows_artifact_kind() {
        let files = [file("echo.proto", "example.com/echo/v1", "v1gateway", "echo/v1/echo")];
        let mut reg = Registry::new();
        reg.set_separate_package(true);
        reg.set_standalone(true);

        let generator = Generator::default();
        let (plans, _) = generator.plan_all(&mut reg, &files);
        let [primary, shim] = &plans[0].artifacts[..] else {
            panic!("expected a split plan");
        };

        let primary = generator.render(&reg, primary);
        assert!(!primary.is_alias_shim);
        assert!(primary.content.contains("func RegisterEchoServiceHandlerServer("));

        let shim = generator.render(&reg, shim);
        assert!(shim.is_alias_shim);
        assert!(shim.content.contains("Deprecated: This package has moved to \"example.com/echo/v1/v1gateway\""));
        assert_eq!(shim.content.matches(" = aliased.").count(), 4);
    }
}
