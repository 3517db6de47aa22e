//! Precompile stage - forces materialization of requested pairs.

use indexmap::IndexSet;
use mapweave_core::{MapConfig, TypePair};

use crate::{
    BuildError, PrecompileError,
    pipeline::{BuildContext, Stage},
};

/// Materialize and cache the conversion function of every pair in `pairs`.
///
/// Pairs are compiled in list order; repeats are compiled once. A failing
/// pair does not stop the batch.
///
/// Returns the number of distinct pairs that compiled.
///
/// # Errors
///
/// Returns [`BuildError::Precompile`] carrying one [`PrecompileError`] per
/// failing pair, in list order, if any pair failed.
pub fn precompile<'a>(
    config: &mut MapConfig,
    pairs: impl IntoIterator<Item = &'a TypePair>,
) -> Result<usize, BuildError> {
    let pairs: IndexSet<TypePair> = pairs.into_iter().copied().collect();
    let mut errors = Vec::new();
    let mut compiled = 0;

    for pair in pairs {
        match config.get_or_compile(pair) {
            Ok(_) => compiled += 1,
            Err(source) => {
                tracing::debug!(%pair, error = %source, "pair failed to precompile");
                errors.push(PrecompileError { pair, source });
            }
        }
    }

    if errors.is_empty() {
        Ok(compiled)
    } else {
        Err(BuildError::Precompile { errors })
    }
}

/// Stage that precompiles the options' pairs.
pub struct PrecompileStage;

impl Stage for PrecompileStage {
    fn name(&self) -> &'static str {
        "precompile"
    }

    fn description(&self) -> &'static str {
        "Materialize conversion functions for requested pairs"
    }

    fn skip_reason(&self, ctx: &BuildContext<'_>) -> Option<&'static str> {
        if !ctx.actions.precompile_type_pairs {
            Some("precompile not requested")
        } else if ctx.options.pairs.is_empty() {
            Some("no pairs")
        } else {
            None
        }
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        ctx.report.precompiled = precompile(ctx.config, &ctx.options.pairs)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User;
    struct UserDto;
    struct Badge;
    struct Ghost;

    fn config() -> MapConfig {
        let mut config = MapConfig::new();
        config.register(|_: &User| UserDto).expect("register");
        config.register(|_: &UserDto| Badge).expect("register");
        config
    }

    #[test]
    fn test_precompile_caches_requested_pairs() {
        let mut config = config();
        let pairs = [TypePair::of::<User, UserDto>()];

        let compiled = precompile(&mut config, &pairs).expect("precompile should succeed");

        assert_eq!(compiled, 1);
        assert!(config.is_compiled(TypePair::of::<User, UserDto>()));
        assert!(!config.is_compiled(TypePair::of::<UserDto, Badge>()));
    }

    #[test]
    fn test_duplicate_pairs_compile_once() {
        let mut config = config();
        let pair = TypePair::of::<User, UserDto>();

        let compiled = precompile(&mut config, &[pair, pair]).expect("precompile should succeed");

        assert_eq!(compiled, 1);
        assert_eq!(config.compiled_count(), 1);
    }

    #[test]
    fn test_failures_are_collected_in_order() {
        let mut config = config();
        let pairs = [
            TypePair::of::<Ghost, User>(),
            TypePair::of::<User, UserDto>(),
            TypePair::of::<User, Ghost>(),
        ];

        let err = precompile(&mut config, &pairs).unwrap_err();

        assert_eq!(
            err.failed_pairs(),
            vec![TypePair::of::<Ghost, User>(), TypePair::of::<User, Ghost>()]
        );
        assert!(config.is_compiled(TypePair::of::<User, UserDto>()));
    }
}
