use miette::Diagnostic;
use thiserror::Error;

use crate::TypePair;

/// Errors raised while contributing to a [`MapConfig`](crate::MapConfig).
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot register `{pair}`: the configuration is frozen")]
    #[diagnostic(
        code(mapweave::frozen),
        help("register every rule before the build freezes the configuration")
    )]
    Frozen { pair: TypePair },

    #[error("cannot change the compilation strategy: the configuration is frozen")]
    #[diagnostic(code(mapweave::frozen))]
    FrozenStrategy,

    #[error("{message}")]
    #[diagnostic(code(mapweave::contribution))]
    Contribution { message: String },
}

impl ConfigError {
    /// A failure raised by user contribution code (modules, registrars, hooks).
    pub fn contribution(message: impl Into<String>) -> Self {
        ConfigError::Contribution {
            message: message.into(),
        }
    }
}

/// Errors raised while materializing the conversion function for a pair.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum CompileError {
    #[error("no rule registered for `{pair}`")]
    #[diagnostic(
        code(mapweave::missing_rule),
        help("register a rule for this pair in a module, a registrar or a `MapFrom` impl")
    )]
    MissingRule { pair: TypePair },

    #[error("rules for `{pair}` form a cycle: {}", display_path(.path))]
    #[diagnostic(
        code(mapweave::cycle),
        help("a `via` rule must not lead back to a pair it depends on")
    )]
    Cycle { pair: TypePair, path: Vec<TypePair> },

    #[error("cannot compile `{pair}`")]
    #[diagnostic(code(mapweave::step))]
    Step {
        pair: TypePair,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// The pair the error was reported for.
    pub fn pair(&self) -> TypePair {
        match self {
            CompileError::MissingRule { pair }
            | CompileError::Cycle { pair, .. }
            | CompileError::Step { pair, .. } => *pair,
        }
    }
}

fn display_path(path: &[TypePair]) -> String {
    path.iter()
        .map(|pair| format!("`{}`", pair))
        .collect::<Vec<_>>()
        .join(" => ")
}

/// Errors raised while converting a value.
#[derive(Debug, Error, Diagnostic)]
pub enum MapError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Compile(#[from] CompileError),

    #[error("value passed to `{pair}` is not of the source type")]
    #[diagnostic(code(mapweave::downcast))]
    Downcast { pair: TypePair },
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = CompileError::Cycle {
            pair: TypePair::of::<A, B>(),
            path: vec![TypePair::of::<A, B>(), TypePair::of::<B, A>()],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"rules for `mapweave_core::error::tests::A -> mapweave_core::error::tests::B` form a cycle: `mapweave_core::error::tests::A -> mapweave_core::error::tests::B` => `mapweave_core::error::tests::B -> mapweave_core::error::tests::A`"
        );
    }

    #[test]
    fn test_step_reports_outer_pair() {
        let inner = CompileError::MissingRule {
            pair: TypePair::of::<B, A>(),
        };
        let err = CompileError::Step {
            pair: TypePair::of::<A, A>(),
            source: Box::new(inner),
        };
        assert_eq!(err.pair(), TypePair::of::<A, A>());
        assert!(std::error::Error::source(&err).is_some());
    }
}
