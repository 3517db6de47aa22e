//! Build actions: hooks and stage gates.

use std::fmt;

use mapweave_core::{ConfigError, MapConfig};

/// A hook run against the configuration between pipeline stages.
pub type Hook = Box<dyn FnMut(&mut MapConfig) -> Result<(), ConfigError>>;

/// Hooks and gates for one pipeline run.
///
/// A gate that is set while its input is empty (no assemblies, no pairs)
/// is a no-op.
#[derive(Default)]
pub struct BuildActions {
    /// Runs after scanning and before precompilation.
    pub on_before_compile: Option<Hook>,
    /// Runs after precompilation and before freezing.
    pub on_after_compile: Option<Hook>,
    /// Scan the options' assemblies.
    pub scan_assemblies: bool,
    /// Precompile the options' pairs.
    pub precompile_type_pairs: bool,
    /// Freeze the configuration at the end.
    pub freeze: bool,
}

impl BuildActions {
    /// Actions with every gate closed and no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions with every gate open.
    pub fn all() -> Self {
        Self {
            scan_assemblies: true,
            precompile_type_pairs: true,
            freeze: true,
            ..Self::default()
        }
    }

    /// Set the before-compile hook.
    pub fn before_compile<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut MapConfig) -> Result<(), ConfigError> + 'static,
    {
        self.on_before_compile = Some(Box::new(hook));
        self
    }

    /// Set the after-compile hook.
    pub fn after_compile<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut MapConfig) -> Result<(), ConfigError> + 'static,
    {
        self.on_after_compile = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for BuildActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildActions")
            .field("on_before_compile", &self.on_before_compile.is_some())
            .field("on_after_compile", &self.on_after_compile.is_some())
            .field("scan_assemblies", &self.scan_assemblies)
            .field("precompile_type_pairs", &self.precompile_type_pairs)
            .field("freeze", &self.freeze)
            .finish()
    }
}
