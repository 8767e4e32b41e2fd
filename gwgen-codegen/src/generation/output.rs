//! Output registration for rendered artifacts.
//!
//! Rendered artifacts are registered here and then either previewed or
//! written below an output directory.
//!
//! # Example
//!
//! ```ignore
//! let mut output = OutputRegistry::new();
//! output.register_generation(&generation);
//! output.write_all(&out_dir)?;
//! ```

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use gwgen_core::{GeneratedFile, write_file};

use crate::generator::Generation;

/// Category of output file, determining write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileCategory {
    /// Gateway code, written first.
    Gateway,
    /// Re-export shims kept at a legacy location, written last.
    AliasShim,
}

/// An entry in the output registry.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Relative path from output directory.
    pub path: String,
    /// File content.
    pub content: String,
    pub category: FileCategory,
}

impl FileEntry {
    /// Create a gateway entry.
    pub fn gateway(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Gateway)
    }

    /// Create an alias shim entry.
    pub fn alias_shim(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::AliasShim)
    }

    fn new(path: impl Into<String>, content: impl Into<String>, category: FileCategory) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            category,
        }
    }

    /// Create from a GeneratedFile.
    pub fn from_generated<F: GeneratedFile>(file: &F, category: FileCategory) -> Self {
        let path = file.path(Path::new("")).to_string_lossy().into_owned();
        Self::new(path, file.render(), category)
    }

    /// Get the full path for this entry.
    pub fn full_path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    /// Write this file to disk, replacing any previous output.
    pub fn write(&self, base: &Path) -> Result<()> {
        let path = self.full_path(base);
        write_file(&path, &self.content)
            .wrap_err_with(|| format!("failed to write {}", path.display()))
    }
}

/// Registry of files to write, ordered by category.
#[derive(Debug, Default)]
pub struct OutputRegistry {
    entries: Vec<FileEntry>,
}

impl OutputRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file entry.
    pub fn register(&mut self, entry: FileEntry) {
        self.entries.push(entry);
    }

    /// Register multiple file entries.
    pub fn register_all(&mut self, entries: impl IntoIterator<Item = FileEntry>) {
        self.entries.extend(entries);
    }

    /// All entries, gateways before alias shims, otherwise in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.category);
        sorted.into_iter()
    }

    /// Register every rendered artifact of a generation run.
    pub fn register_generation(&mut self, generation: &Generation) {
        for artifact in &generation.artifacts {
            let category = if artifact.is_alias_shim {
                FileCategory::AliasShim
            } else {
                FileCategory::Gateway
            };
            self.register(FileEntry::from_generated(artifact, category));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Preview all files (returns path and content pairs).
    pub fn preview(&self) -> Vec<PreviewEntry> {
        self.entries()
            .map(|e| PreviewEntry {
                path: e.path.clone(),
                content: e.content.clone(),
                category: e.category,
            })
            .collect()
    }

    /// Write all files below `base`.
    pub fn write_all(&self, base: &Path) -> Result<WriteStats> {
        let mut stats = WriteStats::default();

        for entry in self.entries() {
            entry.write(base)?;
            stats.written += 1;
            stats.written_paths.push(entry.path.clone());
        }

        Ok(stats)
    }
}

/// A preview entry for displaying what would be generated.
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub path: String,
    pub content: String,
    pub category: FileCategory,
}

/// Statistics from a write operation.
#[derive(Debug, Default)]
pub struct WriteStats {
    pub written: usize,
    pub written_paths: Vec<String>,
}
