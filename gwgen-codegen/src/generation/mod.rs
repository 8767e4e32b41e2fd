//! Generated output management.
//!
//! - [`GoImports`] - Import tracking, deduplication and rendering
//! - [`OutputRegistry`] - Registration and writing of rendered artifacts

mod imports;
mod output;

pub use imports::GoImports;
pub use output::{FileCategory, FileEntry, OutputRegistry, PreviewEntry, WriteStats};
