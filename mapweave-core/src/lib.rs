//! Core types for mapweave.
//!
//! This crate provides the configuration store that the build pipeline in
//! `mapweave-build` assembles: type keys, rules, compilation strategies and
//! the [`MapConfig`] registry itself.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod key;
mod rule;
mod strategy;

pub use config::MapConfig;
pub use error::{CompileError, ConfigError, MapError};
pub use key::{TypeKey, TypePair};
pub use rule::{Converter, Plan, Rule};
pub use strategy::{CompileStrategy, Interpreted, MapFn, Precompiled, StrategyKind};
