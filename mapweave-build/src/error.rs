use mapweave_core::{CompileError, ConfigError, TypePair};
use miette::Diagnostic;
use thiserror::Error;

use crate::manifest::ManifestError;

/// A pair that could not be precompiled, with the underlying cause.
#[derive(Debug, Error, Diagnostic)]
#[error("failed to precompile `{pair}`")]
#[diagnostic(code(mapweave::precompile_pair))]
pub struct PrecompileError {
    pub pair: TypePair,
    #[source]
    #[diagnostic_source]
    pub source: CompileError,
}

/// A discovered unit that failed to register during an assembly scan.
#[derive(Debug, Error, Diagnostic)]
#[error("`{unit}` in assembly `{assembly}` failed to register")]
#[diagnostic(code(mapweave::scan))]
pub struct ScanError {
    pub assembly: String,
    pub unit: &'static str,
    #[source]
    #[diagnostic_source]
    pub source: ConfigError,
}

/// Why a build failed.
///
/// Argument and authoring errors abort at once. Precompile errors are
/// collected over the whole batch and reported together.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Argument(#[from] ManifestError),

    #[error("module `{module}` failed to register")]
    #[diagnostic(code(mapweave::module))]
    Module {
        module: String,
        #[source]
        #[diagnostic_source]
        source: ConfigError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scan(#[from] ScanError),

    #[error("{hook} hook failed")]
    #[diagnostic(code(mapweave::hook))]
    Hook {
        hook: &'static str,
        #[source]
        #[diagnostic_source]
        source: ConfigError,
    },

    #[error("{} type pair(s) failed to precompile", count(.errors))]
    #[diagnostic(
        code(mapweave::precompile),
        help("every failing pair is listed below; fix or remove them and rebuild")
    )]
    Precompile {
        #[related]
        errors: Vec<PrecompileError>,
    },
}

impl From<Box<ManifestError>> for BuildError {
    fn from(err: Box<ManifestError>) -> Self {
        BuildError::Argument(*err)
    }
}

fn count(errors: &[PrecompileError]) -> usize {
    errors.len()
}

impl BuildError {
    /// The per-pair failures of a precompile error; empty for other errors.
    pub fn precompile_errors(&self) -> &[PrecompileError] {
        match self {
            BuildError::Precompile { errors } => errors,
            _ => &[],
        }
    }

    /// The pairs that failed to precompile, in request order.
    pub fn failed_pairs(&self) -> Vec<TypePair> {
        self.precompile_errors().iter().map(|e| e.pair).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn test_precompile_error_counts_pairs() {
        let pair = TypePair::of::<A, B>();
        let err = BuildError::Precompile {
            errors: vec![PrecompileError {
                pair,
                source: CompileError::MissingRule { pair },
            }],
        };

        assert_eq!(err.to_string(), "1 type pair(s) failed to precompile");
        assert_eq!(err.failed_pairs(), vec![pair]);
        assert_eq!(err.related().map(|r| r.count()), Some(1));
    }

    #[test]
    fn test_other_errors_have_no_failed_pairs() {
        let err = BuildError::Hook {
            hook: "before-compile",
            source: ConfigError::contribution("boom"),
        };
        assert!(err.failed_pairs().is_empty());
        assert_eq!(err.to_string(), "before-compile hook failed");
    }
}
