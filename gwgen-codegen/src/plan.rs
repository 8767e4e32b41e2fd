//! Artifact planning.
//!
//! Decides, per descriptor file, which gateway artifacts to produce:
//!
//! - **Empty**: no service has a bound method; nothing is produced or recorded.
//! - **Single**: one artifact in the file's own package.
//! - **Split**: separate-package and standalone modes are both on; the gateway
//!   moves to `<path>/<name>` and an alias shim stays at the old location.
//!
//! All companion packages of a file are resolved before anything is recorded
//! in the [`Registry`], so a failing file leaves no trace.

use gwgen_descriptor::{
    Error, File, PackageIdentity, Registry, Result, Service, join_path, resolve_companion,
};
use tracing::debug;

/// Extension of generated gateway files.
pub const GATEWAY_FILE_SUFFIX: &str = ".pb.gw.go";

/// Shape of the output for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    Empty,
    Single,
    Split,
}

impl std::fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanOutcome::Empty => write!(f, "empty"),
            PlanOutcome::Single => write!(f, "single"),
            PlanOutcome::Split => write!(f, "split"),
        }
    }
}

/// What an artifact contains.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactKind {
    /// Full gateway code.
    Gateway,
    /// Re-exports of `target`'s registration symbols only.
    AliasShim { target: PackageIdentity },
}

/// One output file, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedArtifact {
    /// Output path relative to the output directory.
    pub filename: String,
    /// Package the artifact declares.
    pub package: PackageIdentity,
    /// Package the descriptor file declared; companion imports are keyed by it.
    pub origin: PackageIdentity,
    /// Descriptor file the artifact was generated from.
    pub source: String,
    /// RPC-stub import paths available to this artifact, deduplicated.
    pub companion_imports: Vec<String>,
    pub kind: ArtifactKind,
    /// Services with at least one bound method.
    pub services: Vec<Service>,
}

impl PlannedArtifact {
    pub fn is_alias_shim(&self) -> bool {
        matches!(self.kind, ArtifactKind::AliasShim { .. })
    }

    /// Re-read companion imports for the origin package.
    ///
    /// Files planned after this one may have recorded imports for the same
    /// package; call this once every file has been planned. Alias shims
    /// import nothing but their target and are left untouched.
    pub fn refresh_companion_imports(&mut self, registry: &Registry) {
        if self.is_alias_shim() {
            return;
        }
        self.companion_imports = dedup(registry.companion_imports_for(&self.origin));
    }
}

/// The planned output of one descriptor file.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Descriptor file name.
    pub file: String,
    pub outcome: PlanOutcome,
    /// Gateway artifact first, alias shim (if any) second.
    pub artifacts: Vec<PlannedArtifact>,
}

impl Plan {
    fn empty(file: &File) -> Self {
        Self {
            file: file.name.clone(),
            outcome: PlanOutcome::Empty,
            artifacts: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// The artifact carrying gateway code.
    pub fn primary(&self) -> Option<&PlannedArtifact> {
        self.artifacts.iter().find(|a| !a.is_alias_shim())
    }

    /// The alias shim, for split plans.
    pub fn alias_shim(&self) -> Option<&PlannedArtifact> {
        self.artifacts.iter().find(|a| a.is_alias_shim())
    }
}

/// Plans the artifacts of descriptor files against a [`Registry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactPlanner;

impl ArtifactPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plan one file, recording its companion imports.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPackagePath`] for a file with gateway services but
    /// no package path, and [`Error::InvalidPackageIdentity`] when
    /// separate-package mode needs a companion for a package whose name lacks
    /// the gateway suffix. Nothing is recorded on error.
    pub fn plan(&self, file: &File, registry: &mut Registry) -> Result<Plan> {
        if !file.has_bindings() {
            debug!(file = %file.name, outcome = %PlanOutcome::Empty, "planned file");
            return Ok(Plan::empty(file));
        }
        if file.package.path.is_empty() {
            return Err(Error::empty_package_path(file.name.clone()));
        }

        let services = self.prepare_services(file, registry)?;
        for companion in services.iter().filter_map(|svc| svc.companion.as_ref()) {
            registry.record_companion_import(&file.package, companion.path.clone());
        }
        let companion_imports = dedup(registry.companion_imports_for(&file.package));

        let plan = if registry.split_enabled() {
            self.split(file, services, companion_imports)
        } else {
            self.single(file, services, companion_imports)
        };
        debug!(
            file = %plan.file,
            outcome = %plan.outcome,
            artifacts = plan.artifacts.len(),
            "planned file"
        );
        Ok(plan)
    }

    /// Clone the gateway services, resolving companions where required.
    fn prepare_services(&self, file: &File, registry: &Registry) -> Result<Vec<Service>> {
        let companion = if registry.separate_package() {
            Some(resolve_companion(&file.package)?)
        } else {
            None
        };

        Ok(file
            .gateway_services()
            .map(|svc| {
                let mut svc = svc.clone();
                if companion.is_some() {
                    svc.companion = companion.clone();
                }
                if registry.split_enabled() {
                    svc.force_prefixed_name = true;
                }
                svc
            })
            .collect())
    }

    fn single(&self, file: &File, services: Vec<Service>, companion_imports: Vec<String>) -> Plan {
        let artifact = PlannedArtifact {
            filename: format!("{}{}", file.generated_filename_prefix, GATEWAY_FILE_SUFFIX),
            package: file.package.clone(),
            origin: file.package.clone(),
            source: file.name.clone(),
            companion_imports,
            kind: ArtifactKind::Gateway,
            services,
        };

        Plan {
            file: file.name.clone(),
            outcome: PlanOutcome::Single,
            artifacts: vec![artifact],
        }
    }

    fn split(&self, file: &File, services: Vec<Service>, companion_imports: Vec<String>) -> Plan {
        let relocated = file.package.relocated();

        let primary = PlannedArtifact {
            filename: relocated_filename(&file.generated_filename_prefix, &file.package.name),
            package: relocated.clone(),
            origin: file.package.clone(),
            source: file.name.clone(),
            companion_imports,
            kind: ArtifactKind::Gateway,
            services: services.clone(),
        };
        let alias = PlannedArtifact {
            filename: format!("{}{}", file.generated_filename_prefix, GATEWAY_FILE_SUFFIX),
            package: file.package.clone(),
            origin: file.package.clone(),
            source: file.name.clone(),
            companion_imports: Vec::new(),
            kind: ArtifactKind::AliasShim { target: relocated },
            services,
        };

        Plan {
            file: file.name.clone(),
            outcome: PlanOutcome::Split,
            artifacts: vec![primary, alias],
        }
    }
}

/// `foo/bar/v1/example` in package `v1gateway` becomes
/// `foo/bar/v1/v1gateway/example.pb.gw.go`.
fn relocated_filename(prefix: &str, package_name: &str) -> String {
    let (dir, base) = prefix.rsplit_once('/').unwrap_or(("", prefix));
    format!(
        "{}/{}{}",
        join_path(dir, package_name),
        base,
        GATEWAY_FILE_SUFFIX
    )
}

/// Keep the first occurrence of every path, in order.
fn dedup(paths: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(paths.len());
    for path in paths {
        if !seen.contains(path) {
            seen.push(path.clone());
        }
    }
    seen
}
