//! Core utilities and types for the gwgen gateway generator.
//!
//! This crate provides the generated-file abstraction shared by the
//! descriptor, codegen and command-line crates.

mod file;

pub use file::{GENERATED_HEADER, GeneratedFile, write_file};
