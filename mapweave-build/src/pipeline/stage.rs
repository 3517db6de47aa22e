//! Pipeline stage trait.

use serde::Serialize;

use super::BuildContext;
use crate::BuildError;

/// Information about a pipeline stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageInfo {
    /// The stage name.
    pub name: &'static str,
    /// A human-readable description.
    pub description: &'static str,
}

/// A stage in the build pipeline.
///
/// Stages run in a fixed order over one [`BuildContext`]. Each stage
/// completes before the next one starts.
pub trait Stage {
    /// The name of this stage (used in diagnostics, logs and reports).
    fn name(&self) -> &'static str;

    /// A human-readable description of what this stage does.
    fn description(&self) -> &'static str;

    /// Why this stage should not run for this build, if it should not.
    ///
    /// The pipeline records the reason as an info diagnostic and moves on.
    #[allow(unused_variables)]
    fn skip_reason(&self, ctx: &BuildContext<'_>) -> Option<&'static str> {
        None
    }

    /// Run this stage on the build context.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage fails. Non-fatal issues should be
    /// recorded as diagnostics instead.
    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError>;

    /// Get information about this stage.
    fn info(&self) -> StageInfo {
        StageInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
