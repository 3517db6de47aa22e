//! Build options: what one build request contributes.

use std::fmt;

use indexmap::IndexSet;
use mapweave_core::{ConfigError, MapConfig, TypePair};
use serde::{Deserialize, Serialize};

use crate::{Assembly, BuildActions, Module};

/// An inline configuration action applied to a fresh configuration before
/// the pipeline runs.
pub type ConfigureAction = Box<dyn Fn(&mut MapConfig) -> Result<(), ConfigError>>;

/// Which mapper facade the caller should expose over the built configuration.
///
/// The pipeline does not interpret this; it is carried through to
/// [`Built`](crate::Built).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapperKind {
    /// A mapper that is scoped to the hosting application's services.
    #[default]
    Service,
    /// A plain mapper over the configuration only.
    Plain,
}

impl fmt::Display for MapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperKind::Service => write!(f, "service"),
            MapperKind::Plain => write!(f, "plain"),
        }
    }
}

/// Everything one build request contributes.
///
/// Built fresh per build and read-only while the pipeline runs.
///
/// # Example
///
/// ```ignore
/// let mut options = BuildOptions::new();
/// options
///     .module(BillingModule)
///     .scan(mapweave_build::this_assembly!())
///     .precompile::<Invoice, InvoiceDto>();
/// options.freeze_configuration = true;
/// ```
#[derive(Default)]
pub struct BuildOptions {
    /// Assemblies to scan, deduplicated by name.
    pub assemblies: IndexSet<Assembly>,
    /// Pairs to precompile, in order. Duplicates are harmless.
    pub pairs: Vec<TypePair>,
    /// The mapper flavor to expose downstream.
    pub mapper: MapperKind,
    /// Freeze the configuration at the end of the build.
    pub freeze_configuration: bool,
    /// Inline action applied to a fresh configuration by [`MapBuilder`](crate::MapBuilder).
    pub configure: Option<ConfigureAction>,
    /// Module contributors, run in order.
    pub modules: Vec<Box<dyn Module>>,
}

impl BuildOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an assembly to scan.
    pub fn scan(&mut self, assembly: Assembly) -> &mut Self {
        self.assemblies.insert(assembly);
        self
    }

    /// Add a pair to precompile.
    pub fn precompile<S: 'static, D: 'static>(&mut self) -> &mut Self {
        self.precompile_pair(TypePair::of::<S, D>())
    }

    /// Add a type-erased pair to precompile.
    pub fn precompile_pair(&mut self, pair: TypePair) -> &mut Self {
        self.pairs.push(pair);
        self
    }

    /// Add a module contributor.
    pub fn module(&mut self, module: impl Module + 'static) -> &mut Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Set the inline configuration action, replacing any previous one.
    pub fn configure<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&mut MapConfig) -> Result<(), ConfigError> + 'static,
    {
        self.configure = Some(Box::new(action));
        self
    }

    /// The build actions implied by these options: scan when assemblies are
    /// listed, precompile when pairs are listed, freeze when requested.
    pub fn actions(&self) -> BuildActions {
        BuildActions {
            scan_assemblies: !self.assemblies.is_empty(),
            precompile_type_pairs: !self.pairs.is_empty(),
            freeze: self.freeze_configuration,
            ..BuildActions::default()
        }
    }
}

impl fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("assemblies", &self.assemblies)
            .field("pairs", &self.pairs)
            .field("mapper", &self.mapper)
            .field("freeze_configuration", &self.freeze_configuration)
            .field("configure", &self.configure.is_some())
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
