//! Built-in pipeline stages.
//!
//! - [`ModulesStage`] - runs the module contributors
//! - [`ScanStage`] - contributes the units of the requested assemblies
//! - [`HookStage`] - runs a before- or after-compile hook
//! - [`PrecompileStage`] - materializes the requested pairs
//! - [`FreezeStage`] - freezes the store
//!
//! The scan, precompile and freeze operations are also available as free
//! functions for callers that drive a store without a pipeline.

mod freeze;
mod hooks;
mod modules;
mod precompile;
mod scan;

pub use freeze::{FreezeStage, freeze};
pub use hooks::{HookPoint, HookStage};
pub use modules::ModulesStage;
pub use precompile::{PrecompileStage, precompile};
pub use scan::{AssemblySummary, ScanStage, ScanSummary, scan};
