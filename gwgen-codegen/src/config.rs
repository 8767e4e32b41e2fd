//! `gwgen.toml` configuration.
//!
//! ```toml
//! [generate]
//! separate_package = true
//! standalone = true
//! omit_package_doc = false
//! register_func_suffix = "Handler"
//! output = "gen"
//! ```

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use gwgen_descriptor::{Error, Registry, Result, SourceContext};
use serde::{Deserialize, Serialize};

use crate::generator::{DEFAULT_REGISTER_FUNC_SUFFIX, GeneratorOptions};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "gwgen.toml";

/// Root of `gwgen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub generate: GenerateConfig,
}

/// The `[generate]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub separate_package: bool,
    pub standalone: bool,
    pub omit_package_doc: bool,
    pub register_func_suffix: String,
    /// Output directory for generated files.
    pub output: Option<PathBuf>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            separate_package: false,
            standalone: false,
            omit_package_doc: false,
            register_func_suffix: DEFAULT_REGISTER_FUNC_SUFFIX.to_string(),
            output: None,
        }
    }
}

impl FromStr for Config {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml_str(s, CONFIG_FILE)
    }
}

impl Config {
    /// Parse a config file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse from a string with a filename for error reporting.
    pub fn from_toml_str(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        toml::from_str(content).map_err(|e| ctx.toml_error(e))
    }
}

impl GenerateConfig {
    /// Configure the registry's modes. Call once, before generation.
    pub fn apply(&self, registry: &mut Registry) {
        registry.set_separate_package(self.separate_package);
        registry.set_standalone(self.standalone);
        registry.set_omit_package_doc(self.omit_package_doc);
    }

    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            register_func_suffix: self.register_func_suffix.clone(),
        }
    }
}
