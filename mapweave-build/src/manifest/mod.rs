//! Build manifests (`mapweave.toml`).
//!
//! A manifest selects a build without code: which assemblies to scan, which
//! pairs to precompile, whether to freeze and which mapper flavor to expose.
//!
//! ```toml
//! [build]
//! assemblies = ["sample"]
//! freeze = true
//! mapper = "service"
//!
//! [[precompile]]
//! source = "User"
//! destination = "UserDto"
//! ```

mod catalog;
mod error;
mod file;

pub use catalog::{ResolveError, TypeCatalog};
pub use error::{ManifestError, Result, SourceContext};
pub use file::ManifestFile;
use serde::Deserialize;
use toml::Spanned;

use crate::MapperKind;

/// Root of a build manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Build settings.
    #[serde(default)]
    pub build: BuildSection,

    /// Pairs to precompile, in order.
    #[serde(default)]
    pub precompile: Vec<PairEntry>,
}

/// The `[build]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Names of the assemblies to scan.
    #[serde(default)]
    pub assemblies: Vec<Spanned<String>>,

    /// Freeze the configuration at the end of the build.
    #[serde(default)]
    pub freeze: bool,

    /// The mapper flavor to expose.
    #[serde(default)]
    pub mapper: MapperKind,
}

/// One `[[precompile]]` entry. Names keep their spans for error reporting.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairEntry {
    pub source: Spanned<String>,
    pub destination: Spanned<String>,
}

impl Manifest {
    /// Parse a manifest, attributing errors to `filename`.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SourceContext::new(content, filename).parse_error(e))
    }
}

impl std::str::FromStr for Manifest {
    type Err = Box<ManifestError>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "mapweave.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let manifest: Manifest = r#"
            [build]
            assemblies = ["sample", "billing"]
            freeze = true
            mapper = "plain"

            [[precompile]]
            source = "User"
            destination = "UserDto"
        "#
        .parse()
        .expect("manifest should parse");

        assert_eq!(manifest.build.assemblies.len(), 2);
        assert_eq!(manifest.build.assemblies[1].get_ref(), "billing");
        assert!(manifest.build.freeze);
        assert_eq!(manifest.build.mapper, MapperKind::Plain);
        assert_eq!(manifest.precompile[0].destination.get_ref(), "UserDto");
    }

    #[test]
    fn test_empty_manifest_uses_defaults() {
        let manifest: Manifest = "".parse().expect("manifest should parse");

        assert!(manifest.build.assemblies.is_empty());
        assert!(!manifest.build.freeze);
        assert_eq!(manifest.build.mapper, MapperKind::Service);
        assert!(manifest.precompile.is_empty());
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let err = "[build]\nfreze = true\n".parse::<Manifest>().unwrap_err();

        let ManifestError::Parse { span, .. } = err.as_ref() else {
            panic!("expected a parse error, got {err:?}");
        };
        assert!(span.is_some());
    }

    #[test]
    fn test_bad_mapper_is_a_parse_error() {
        let result = "[build]\nmapper = \"singleton\"\n".parse::<Manifest>();
        assert!(matches!(result.map_err(|e| *e), Err(ManifestError::Parse { .. })));
    }
}
