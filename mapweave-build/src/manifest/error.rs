use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<ManifestError>>;

/// Source context for error reporting.
///
/// Carries the manifest text and its filename so every error can point
/// into the file.
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

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<ManifestError> {
        let span = source.span().map(SourceSpan::from);
        Box::new(ManifestError::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create an unknown type error.
    pub fn unknown_type(
        &self,
        name: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<ManifestError> {
        Box::new(ManifestError::UnknownType {
            src: self.named_source(),
            span: span.into(),
            name: name.into(),
        })
    }

    /// Create an ambiguous type error listing the matching full names.
    pub fn ambiguous_type(
        &self,
        name: impl Into<String>,
        candidates: &[&str],
        span: impl Into<SourceSpan>,
    ) -> Box<ManifestError> {
        Box::new(ManifestError::AmbiguousType {
            src: self.named_source(),
            span: span.into(),
            name: name.into(),
            candidates: candidates.join(", "),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(mapweave::io),
        help("pass the manifest path with --config, or create mapweave.toml")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse build manifest")]
    #[diagnostic(code(mapweave::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown type '{name}'")]
    #[diagnostic(
        code(mapweave::unknown_type),
        help("use a type that appears in a registered rule; `mapweave pairs` lists them")
    )]
    UnknownType {
        #[source_code]
        src: NamedSource<String>,
        #[label("no such type")]
        span: SourceSpan,
        name: String,
    },

    #[error("type name '{name}' is ambiguous")]
    #[diagnostic(
        code(mapweave::ambiguous_type),
        help("use one of the full names: {candidates}")
    )]
    AmbiguousType {
        #[source_code]
        src: NamedSource<String>,
        #[label("matches more than one type")]
        span: SourceSpan,
        name: String,
        candidates: String,
    },
}

impl ManifestError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(ManifestError::Io {
            path: path.into(),
            source,
        })
    }
}
