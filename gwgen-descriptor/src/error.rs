use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for descriptor operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the source content and filename of a descriptor set so
/// parse failures can point at the offending location.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a serde_json error.
    pub fn json_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = line_column_offset(&self.src, source.line(), source.column())
            .map(|offset| SourceSpan::from(offset..offset));
        Box::new(Error::ParseJson {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a parse error from a toml error.
    pub fn toml_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::ParseToml {
            src: self.named_source(),
            span,
            source,
        })
    }
}

/// Byte offset of a 1-based line/column pair, as reported by serde_json.
fn line_column_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(gwgen::io),
        help("check that the file exists and is readable")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}'", src.name())]
    #[diagnostic(code(gwgen::parse_json))]
    ParseJson {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse '{}'", src.name())]
    #[diagnostic(code(gwgen::parse_toml))]
    ParseToml {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("package '{name}' does not end in '{expected_suffix}'")]
    #[diagnostic(
        code(gwgen::invalid_package_identity),
        help(
            "companion packages can only be derived from gateway packages; name the package '<prefix>{expected_suffix}'"
        )
    )]
    InvalidPackageIdentity {
        name: String,
        expected_suffix: String,
    },

    #[error("'{file}' has gateway services but no package path")]
    #[diagnostic(
        code(gwgen::empty_package_path),
        help("set the package path of '{file}' before generating")
    )]
    EmptyPackagePath { file: String },
}

impl Error {
    /// Create an invalid package identity error
    pub fn invalid_package_identity(
        name: impl Into<String>,
        expected_suffix: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::InvalidPackageIdentity {
            name: name.into(),
            expected_suffix: expected_suffix.into(),
        })
    }

    /// Create an empty package path error
    pub fn empty_package_path(file: impl Into<String>) -> Box<Self> {
        Box::new(Error::EmptyPackagePath { file: file.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_offset() {
        let src = "{\n  \"files\": [\n    oops\n  ]\n}";
        assert_eq!(line_column_offset(src, 1, 1), Some(0));
        assert_eq!(line_column_offset(src, 3, 5), Some(19));
        assert_eq!(line_column_offset(src, 0, 0), None);
    }

    #[test]
    fn test_offset_is_clamped() {
        assert_eq!(line_column_offset("{}", 1, 40), Some(2));
    }

    #[test]
    fn test_invalid_package_identity_message() {
        let err = Error::invalid_package_identity("v1", "gateway");
        assert_eq!(err.to_string(), "package 'v1' does not end in 'gateway'");
    }

    #[test]
    fn test_json_error_carries_span() {
        let ctx = SourceContext::new("{\"files\": 3}", "set.json");
        let source = serde_json::from_str::<Vec<String>>("{\"files\": 3}").unwrap_err();
        let err = ctx.json_error(source);
        assert!(matches!(*err, Error::ParseJson { span: Some(_), .. }));
    }
}
