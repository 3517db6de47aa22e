//! The build pipeline.
//!
//! A [`Pipeline`] assembles one [`MapConfig`](mapweave_core::MapConfig) in a
//! fixed order of stages:
//!
//! - modules: every module contributor, in registration order
//! - scan: registrars and `MapFrom` closings of the requested assemblies
//! - before-compile: the caller's hook
//! - precompile: forced materialization of the requested pairs
//! - after-compile: the caller's hook
//! - freeze: switch to the precompiled strategy and close the store
//!
//! # Example
//!
//! ```ignore
//! use mapweave_build::{BuildActions, BuildOptions, Pipeline};
//!
//! let mut options = BuildOptions::new();
//! options.module(UserModule).precompile::<User, UserDto>();
//! let mut actions = options.actions();
//!
//! let report = Pipeline::new().run(&mut config, &options, &mut actions)?;
//! for diag in report.warnings() {
//!     eprintln!("{diag}");
//! }
//! ```

mod context;
mod diagnostic;
mod report;
mod runner;
mod stage;
pub mod stages;

pub use context::BuildContext;
pub use diagnostic::{Diagnostic, Severity};
pub use report::BuildReport;
pub use runner::Pipeline;
pub use stage::{Stage, StageInfo};
pub use stages::{AssemblySummary, ScanSummary};
