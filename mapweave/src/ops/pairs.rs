//! Pairs operation - list the rules each contributor registers.

use mapweave_build::{
    BuildActions, BuildError, BuildOptions, ManifestFile, Pipeline, pipeline::stages,
};
use mapweave_core::MapConfig;

use crate::{
    reports::{PairGroup, PairsReport},
    sample,
};

/// Execute the pairs operation.
///
/// Runs the sample modules and the manifest's assemblies, without
/// precompiling or freezing, and groups the registered pairs by where they
/// come from.
pub fn pairs(file: &ManifestFile) -> Result<PairsReport, BuildError> {
    let modules = sample::modules();
    let assemblies = file.assemblies();
    let mut groups = Vec::new();

    for module in &modules {
        let mut scratch = MapConfig::new();
        module
            .register(&mut scratch)
            .map_err(|source| BuildError::Module {
                module: module.name().to_string(),
                source,
            })?;
        groups.push(PairGroup {
            origin: format!("module {}", module.name()),
            pairs: describe(&scratch),
        });
    }

    for assembly in &assemblies {
        let mut scratch = MapConfig::new();
        stages::scan(&mut scratch, [assembly])?;
        groups.push(PairGroup {
            origin: format!("assembly {}", assembly),
            pairs: describe(&scratch),
        });
    }

    let mut options = BuildOptions::new();
    options.modules = modules;
    for assembly in assemblies {
        options.scan(assembly);
    }
    let mut actions = BuildActions {
        scan_assemblies: true,
        ..BuildActions::new()
    };

    let mut config = MapConfig::new();
    Pipeline::new().run(&mut config, &options, &mut actions)?;

    Ok(PairsReport {
        groups,
        total: config.len(),
    })
}

fn describe(config: &MapConfig) -> Vec<String> {
    config
        .pairs()
        .map(|pair| {
            format!(
                "{} -> {}",
                pair.source.short_name(),
                pair.destination.short_name()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_groups_by_origin() {
        let file = ManifestFile::parse(include_str!("../../mapweave.toml"), "mapweave.toml")
            .expect("manifest should parse");

        let report = pairs(&file).expect("pairs should list");

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].origin, "module users");
        assert_eq!(
            report.groups[0].pairs,
            vec!["User -> UserDto", "UserDto -> UserSummary", "User -> UserSummary"]
        );
        assert_eq!(report.groups[1].origin, "assembly sample");
        assert_eq!(report.groups[1].pairs.len(), 3);
        assert_eq!(report.total, 6);
    }
}
