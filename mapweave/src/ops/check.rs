//! Check operation - run the full build a manifest describes.

use mapweave_build::{BuildError, BuildOptions, MapBuilder, ManifestFile};

use crate::{reports::CheckReport, sample};

/// Execute the check operation.
///
/// Starts from the sample modules, applies the manifest and runs every
/// stage it asks for.
pub fn check(file: &ManifestFile) -> Result<CheckReport, BuildError> {
    let mut catalog = sample::catalog();
    catalog.extend_from_assemblies(&file.assemblies());

    let mut options = BuildOptions::new();
    options.modules = sample::modules();
    file.apply(&catalog, &mut options)?;

    tracing::debug!(
        config = %file.path().display(),
        assemblies = options.assemblies.len(),
        pairs = options.pairs.len(),
        "manifest applied"
    );

    let mapper = options.mapper;
    let built = MapBuilder::build(options)?;

    Ok(CheckReport {
        config_path: file.path().to_path_buf(),
        mapper,
        build: built.report,
    })
}

#[cfg(test)]
mod tests {
    use mapweave_core::{StrategyKind, TypePair};

    use super::*;
    use crate::sample::{Invoice, InvoiceDto};

    fn manifest(content: &str) -> ManifestFile {
        ManifestFile::parse(content, "mapweave.toml").expect("manifest should parse")
    }

    #[test]
    fn test_check_sample_manifest() {
        let file = manifest(include_str!("../../mapweave.toml"));

        let report = check(&file).expect("sample manifest should build");

        assert!(report.build.frozen);
        assert_eq!(report.build.strategy, StrategyKind::Precompiled);
        assert_eq!(report.build.modules, vec!["users".to_string()]);
        assert_eq!(report.build.scan.contributions(), 3);
        assert_eq!(report.build.precompiled, 3);
        assert_eq!(report.build.pairs, 6);
        assert!(!report.build.has_warnings());
    }

    #[test]
    fn test_check_lists_every_failing_pair() {
        let file = manifest(
            r#"
[build]
assemblies = ["sample"]

[[precompile]]
source = "Invoice"
destination = "InvoiceDto"

[[precompile]]
source = "Order"
destination = "OrderCard"

[[precompile]]
source = "InvoiceDto"
destination = "Invoice"
"#,
        );

        let err = check(&file).unwrap_err();

        assert_eq!(
            err.failed_pairs(),
            vec![
                TypePair::of::<Invoice, InvoiceDto>(),
                TypePair::of::<InvoiceDto, Invoice>()
            ]
        );
    }

    #[test]
    fn test_check_manifest_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mapweave.toml");
        std::fs::write(
            &path,
            "[build]\nfreeze = true\n\n[[precompile]]\nsource = \"User\"\ndestination = \"UserSummary\"\n",
        )
        .expect("write manifest");

        let file = ManifestFile::open(&path).expect("manifest should open");
        let report = check(&file).expect("manifest should build");

        assert_eq!(report.config_path, path);
        assert!(report.build.frozen);
        assert_eq!(report.build.precompiled, 1);
        assert!(!report.build.ran("scan"));
    }

    #[test]
    fn test_check_rejects_unknown_type_before_building() {
        let file = manifest("[[precompile]]\nsource = \"User\"\ndestination = \"Receipt\"\n");

        let err = check(&file).unwrap_err();

        assert!(matches!(err, BuildError::Argument(_)));
    }
}
