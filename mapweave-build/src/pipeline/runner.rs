//! Pipeline orchestrator.

use mapweave_core::MapConfig;

use super::{
    BuildContext, BuildReport, Stage, StageInfo,
    stages::{FreezeStage, HookPoint, HookStage, ModulesStage, PrecompileStage, ScanStage},
};
use crate::{BuildActions, BuildError, BuildOptions};

/// The build pipeline orchestrator.
///
/// Runs the built-in stages over one store in a fixed order: modules, scan,
/// before-compile, precompile, after-compile, freeze. The pipeline keeps no
/// state between runs; running it twice on one open store re-applies every
/// contribution with last write wins.
///
/// # Example
///
/// ```ignore
/// let mut config = MapConfig::new();
/// let mut actions = options.actions().before_compile(|config| {
///     config.register(|u: &User| UserSummary::from(u))
/// });
///
/// let report = Pipeline::new().run(&mut config, &options, &mut actions)?;
/// assert!(report.frozen);
/// ```
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create a new pipeline with the built-in stages.
    pub fn new() -> Self {
        Self {
            stages: vec![
                Box::new(ModulesStage),
                Box::new(ScanStage),
                Box::new(HookStage(HookPoint::BeforeCompile)),
                Box::new(PrecompileStage),
                Box::new(HookStage(HookPoint::AfterCompile)),
                Box::new(FreezeStage),
            ],
        }
    }

    /// The stages this pipeline runs, in order.
    pub fn describe(&self) -> Vec<StageInfo> {
        self.stages.iter().map(|stage| stage.info()).collect()
    }

    /// Run the pipeline against `config`.
    ///
    /// Stages whose gate is closed or whose input is empty are skipped and
    /// noted in the report.
    ///
    /// # Errors
    ///
    /// Module, scan and hook failures abort at once. Precompile failures are
    /// collected over the whole batch and returned together; the later
    /// stages do not run.
    ///
    /// Running again on the same store is allowed while it is open. Once
    /// frozen, a rerun fails at the first stage that registers a rule
    /// (with [`ConfigError::Frozen`](mapweave_core::ConfigError::Frozen)
    /// as the source) and leaves the store as it was. A rerun that
    /// registers nothing succeeds.
    pub fn run(
        &self,
        config: &mut MapConfig,
        options: &BuildOptions,
        actions: &mut BuildActions,
    ) -> Result<BuildReport, BuildError> {
        let span = tracing::info_span!(
            "build",
            modules = options.modules.len(),
            assemblies = options.assemblies.len(),
            pairs = options.pairs.len(),
        );
        let _guard = span.enter();

        let mut ctx = BuildContext::new(config, options, actions);
        for stage in &self.stages {
            self.run_stage(stage.as_ref(), &mut ctx)?;
        }

        let report = ctx.finish();
        tracing::info!(
            rules = report.pairs,
            compiled = report.compiled,
            frozen = report.frozen,
            "build finished"
        );
        Ok(report)
    }

    /// Run a single stage, or record why it was skipped.
    fn run_stage(&self, stage: &dyn Stage, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let name = stage.name();

        if let Some(reason) = stage.skip_reason(ctx) {
            ctx.skip(name, reason);
            return Ok(());
        }

        tracing::debug!(stage = name, "running stage");
        stage.run(ctx).inspect_err(|err| {
            tracing::debug!(stage = name, error = %err, "stage failed");
        })?;
        ctx.report.stages.push(name);
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
