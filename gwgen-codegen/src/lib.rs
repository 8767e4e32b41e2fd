//! Artifact planning and Go gateway rendering for gwgen.
//!
//! # Module Structure
//!
//! - [`builder`] - Indented code building blocks
//! - [`generation`] - Go imports and output file registration
//! - [`ArtifactPlanner`] - decides single, split or empty output per file
//! - [`Generator`] - plans, refreshes companion imports and renders a whole run
//! - [`Config`] - `gwgen.toml` loading
//!
//! # Example
//!
//! ```ignore
//! let set = DescriptorSet::open("descriptors.json")?;
//! let mut registry = Registry::new();
//! config.generate.apply(&mut registry);
//!
//! let generation = Generator::new(config.generate.options()).generate(&mut registry, &set.files);
//! let mut output = OutputRegistry::new();
//! output.register_generation(&generation);
//! output.write_all(Path::new("gen"))?;
//! ```

mod config;
mod gateway;
mod generator;
mod go_file;
mod go_func;
mod plan;
mod shim;
mod symbols;

pub mod builder;
pub mod generation;

pub use config::{CONFIG_FILE, Config, GenerateConfig};
pub use gateway::GatewayFile;
pub use generator::{
    DEFAULT_REGISTER_FUNC_SUFFIX, FileFailure, Generation, Generator, GeneratorOptions,
    RenderedArtifact,
};
pub use go_file::GoFile;
pub use go_func::{GoFunc, Param};
pub use plan::{
    ArtifactKind, ArtifactPlanner, GATEWAY_FILE_SUFFIX, Plan, PlanOutcome, PlannedArtifact,
};
pub use shim::{AliasShim, DEFAULT_SHIM_ALIAS, deprecation_notice, shim_reference_name};
pub use symbols::{RegistrationStyle, registration_symbols};
