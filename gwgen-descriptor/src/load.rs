//! Descriptor-set loading.
//!
//! A descriptor set is the already-linked file graph, serialized as JSON
//! (default) or TOML (`.toml` extension).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, File, Result, SourceContext};

/// The files handed to the generator, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    #[serde(default)]
    pub files: Vec<File>,
}

impl DescriptorSet {
    /// Read and parse a descriptor set, picking the format from the extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let ctx = SourceContext::new(src, path.display().to_string());

        let set = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::parse_toml(&ctx)?,
            _ => Self::parse_json(&ctx)?,
        };
        debug!(path = %path.display(), files = set.files.len(), "loaded descriptor set");
        Ok(set)
    }

    /// Parse a JSON descriptor set.
    pub fn from_json_str(src: &str, filename: &str) -> Result<Self> {
        Self::parse_json(&SourceContext::new(src, filename))
    }

    /// Parse a TOML descriptor set.
    pub fn from_toml_str(src: &str, filename: &str) -> Result<Self> {
        Self::parse_toml(&SourceContext::new(src, filename))
    }

    fn parse_json(ctx: &SourceContext) -> Result<Self> {
        serde_json::from_str(ctx.src()).map_err(|e| ctx.json_error(e))
    }

    fn parse_toml(ctx: &SourceContext) -> Result<Self> {
        toml::from_str(ctx.src()).map_err(|e| ctx.toml_error(e))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const JSON: &str = r#"{
        "files": [{
            "name": "example.proto",
            "package": {
                "path": "example.com/mymodule/foo/bar/v1",
                "name": "v1gateway",
                "alias": "extalias"
            },
            "generated_filename_prefix": "foo/bar/v1/example",
            "services": [{
                "name": "ExampleService",
                "methods": [
                    {
                        "name": "Example",
                        "input": { "name": "ExampleMessage" },
                        "output": { "name": "ExampleMessage" },
                        "bindings": [{ "http_method": "GET", "path_template": "/v1/example" }]
                    },
                    {
                        "name": "ExampleWithoutBindings",
                        "input": {
                            "name": "Empty",
                            "package": { "path": "google.golang.org/protobuf/types/known/emptypb", "name": "emptypb" }
                        },
                        "output": { "name": "Empty" }
                    }
                ]
            }]
        }]
    }"#;

    #[test]
    fn test_parse_json() {
        let set = DescriptorSet::from_json_str(JSON, "set.json").unwrap();
        assert_eq!(set.len(), 1);

        let file = &set.files[0];
        assert_eq!(file.package.alias.as_deref(), Some("extalias"));
        assert_eq!(file.services[0].methods.len(), 2);
        assert!(file.services[0].methods[0].is_bound());
        assert!(!file.services[0].methods[1].is_bound());
        assert_eq!(
            file.services[0].methods[1].input.package.as_ref().unwrap().name,
            "emptypb"
        );
    }

    #[test]
    fn test_parse_toml() {
        let src = r#"
            [[files]]
            name = "example.proto"
            generated_filename_prefix = "gen/v1/example"

            [files.package]
            path = "foo/bar/baz/gen/v1"
            name = "v1"
        "#;
        let set = DescriptorSet::from_toml_str(src, "set.toml").unwrap();

        assert_eq!(set.files[0].package.name, "v1");
        assert!(set.files[0].services.is_empty());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = DescriptorSet::from_json_str("{\"files\": [1]}", "set.json").unwrap_err();
        assert!(matches!(*err, Error::ParseJson { .. }));
    }

    #[test]
    fn test_open_by_extension() {
        let temp = TempDir::new().unwrap();
        let json = temp.path().join("set.json");
        std::fs::write(&json, JSON).unwrap();

        let set = DescriptorSet::open(&json).unwrap();
        assert_eq!(set.files[0].name, "example.proto");
    }

    #[test]
    fn test_open_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = DescriptorSet::open(temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
