//! Build pipeline for mapweave configurations.
//!
//! This crate assembles a [`MapConfig`](mapweave_core::MapConfig) from
//! independent contributions and optionally precompiles and freezes it.
//!
//! # Module Organization
//!
//! - [`contributor`] - Contribution contracts ([`Module`], [`Register`], [`MapFrom`])
//! - [`assembly`] - Link-time discovery of registrars ([`Assembly`], [`register!`], [`map_from!`])
//! - [`options`] / [`actions`] - What a build request carries
//! - [`pipeline`] - The staged orchestrator and the scan/precompile/freeze stages
//! - [`builder`] - Entry points returning a built configuration and [`Mapper`]
//! - [`manifest`] - TOML build manifests resolved against a [`TypeCatalog`]

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod actions;
pub mod assembly;
pub mod builder;
pub mod contributor;
mod error;
pub mod manifest;
pub mod options;
pub mod pipeline;

pub use actions::{BuildActions, Hook};
pub use assembly::{Assembly, Unit, UnitKind};
pub use builder::{Built, MapBuilder, Mapper};
pub use contributor::{MapFrom, Module, Register};
pub use error::{BuildError, PrecompileError, ScanError};
pub use manifest::{ManifestError, ManifestFile, TypeCatalog};
pub use options::{BuildOptions, ConfigureAction, MapperKind};
pub use pipeline::{BuildReport, Pipeline};

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
