//! Check command report data structures.

use std::path::PathBuf;

use mapweave_build::{BuildReport, MapperKind};
use serde::Serialize;

use super::output::{Output, Report};

/// Report data from a successful manifest build.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// Path to the manifest.
    pub config_path: PathBuf,
    /// The mapper flavor the manifest asks for.
    pub mapper: MapperKind,
    /// What the build did.
    pub build: BuildReport,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for diag in self.build.warnings() {
            let text = match &diag.subject {
                Some(subject) => format!("{}: {} ({})", diag.stage, diag.message, subject),
                None => format!("{}: {}", diag.stage, diag.message),
            };
            out.warning(&text);
        }
        if self.build.has_warnings() {
            out.newline();
        }

        out.preformatted(&format!("✓ {} builds", self.config_path.display()));
        out.newline();

        out.key_value("mapper", &self.mapper.to_string());
        out.key_value("strategy", &self.build.strategy.to_string());
        out.key_value("frozen", if self.build.frozen { "yes" } else { "no" });
        out.key_value("rules", &self.build.pairs.to_string());
        out.key_value("compiled", &self.build.compiled.to_string());
        out.key_value("precompiled", &self.build.precompiled.to_string());
        out.newline();

        out.section("Stages");
        for stage in &self.build.stages {
            out.list_item(stage);
        }

        if !self.build.modules.is_empty() {
            out.section("Modules");
            for module in &self.build.modules {
                out.list_item(module);
            }
        }

        if !self.build.scan.assemblies.is_empty() {
            out.section("Assemblies");
            for summary in &self.build.scan.assemblies {
                out.list_item(&format!(
                    "{} ({} registrar{}, {} map-from)",
                    summary.assembly,
                    summary.registrars,
                    if summary.registrars == 1 { "" } else { "s" },
                    summary.map_from,
                ));
            }
        }
    }
}
