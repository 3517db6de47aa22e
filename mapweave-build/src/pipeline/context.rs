//! Build context passed through pipeline stages.

use mapweave_core::MapConfig;

use super::{BuildReport, Diagnostic};
use crate::{BuildActions, BuildOptions};

/// Context passed through all pipeline stages.
///
/// Holds the store under construction, the build request and the report
/// accumulated so far.
pub struct BuildContext<'a> {
    /// The configuration store being built.
    pub config: &'a mut MapConfig,
    /// What this build contributes.
    pub options: &'a BuildOptions,
    /// Hooks and gates for this build.
    pub actions: &'a mut BuildActions,
    /// Results and diagnostics collected so far.
    pub report: BuildReport,
}

impl<'a> BuildContext<'a> {
    /// Create a new build context.
    pub fn new(
        config: &'a mut MapConfig,
        options: &'a BuildOptions,
        actions: &'a mut BuildActions,
    ) -> Self {
        Self {
            config,
            options,
            actions,
            report: BuildReport::default(),
        }
    }

    /// Add a warning diagnostic.
    pub fn add_warning(&mut self, stage: &str, message: impl Into<String>) {
        self.report
            .diagnostics
            .push(Diagnostic::warning(stage, message));
    }

    /// Add an info diagnostic.
    pub fn add_info(&mut self, stage: &str, message: impl Into<String>) {
        self.report.diagnostics.push(Diagnostic::info(stage, message));
    }

    /// Add a diagnostic with a subject.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.report.diagnostics.push(diagnostic);
    }

    /// Record that a stage was skipped.
    pub fn skip(&mut self, stage: &str, reason: &str) {
        tracing::debug!(stage, reason, "stage skipped");
        self.add_info(stage, format!("skipped: {reason}"));
    }

    /// Consume the context, stamping the final state of the store on the report.
    pub fn finish(self) -> BuildReport {
        let mut report = self.report;
        report.pairs = self.config.len();
        report.compiled = self.config.compiled_count();
        report.strategy = self.config.strategy();
        report.frozen = self.config.is_frozen();
        report
    }
}
