//! Descriptor model for the gwgen gateway generator.
//!
//! This crate holds everything the planner reads and writes:
//!
//! - [`File`], [`Service`], [`Method`], [`Binding`] - the linked descriptor graph
//! - [`PackageIdentity`] - where a generated package lives and how it is referenced
//! - [`resolve_companion`] - derives the RPC-stub package of a gateway package
//! - [`Registry`] - run-wide mode flags and the companion-import accumulator
//! - [`DescriptorSet`] - JSON/TOML loading of a descriptor graph
//!
//! # Architecture
//!
//! ```text
//! descriptor set → gwgen-descriptor (model) → gwgen-codegen (plan, render) → files
//! ```

mod error;
mod load;
mod model;
mod package;
mod registry;
mod resolve;

pub use error::{Error, Result, SourceContext};
pub use load::DescriptorSet;
pub use model::{Binding, File, MessageRef, Method, Service};
pub use package::{PackageIdentity, join_path};
pub use registry::Registry;
pub use resolve::{
    BASE_TYPE_SUBPATH, CompanionRule, GATEWAY_SUFFIX, RPC_STUB_SUBPATH, RPC_STUB_SUFFIX,
    resolve_companion,
};
