//! The result of a successful build.

use mapweave_core::StrategyKind;
use serde::Serialize;

use super::{Diagnostic, ScanSummary};

/// What a build did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Stages that ran, in order.
    pub stages: Vec<&'static str>,
    /// Modules that contributed, in order.
    pub modules: Vec<String>,
    /// Units contributed by the assembly scan.
    pub scan: ScanSummary,
    /// Distinct pairs materialized by the precompile stage.
    pub precompiled: usize,
    /// Rules registered in the store when the build ended.
    pub pairs: usize,
    /// Conversion functions cached in the store when the build ended.
    pub compiled: usize,
    /// The store's strategy when the build ended.
    pub strategy: StrategyKind,
    /// Whether the store ended frozen.
    pub frozen: bool,
    /// Non-fatal notes from the stages.
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// Whether the stage with this name ran.
    pub fn ran(&self, stage: &str) -> bool {
        self.stages.contains(&stage)
    }

    /// Check if any warning diagnostics have been recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    /// Count the number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_warning())
            .count()
    }

    /// Get all warning diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity.is_warning())
    }
}
