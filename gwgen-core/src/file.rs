use std::path::{Path, PathBuf};

use eyre::Result;

/// Header line carried by every generated Go source file.
pub const GENERATED_HEADER: &str = "// Code generated by gwgen. DO NOT EDIT.";

/// Trait for types that represent a generated file.
///
/// Generated files are always overwritten; regeneration replaces whatever
/// an earlier run left behind.
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Render the file content
    fn render(&self) -> String;

    /// Write the file to disk, returning the path written.
    fn write(&self, base: &Path) -> Result<PathBuf> {
        let path = self.path(base);
        write_file(&path, &self.render())?;
        Ok(path)
    }
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
