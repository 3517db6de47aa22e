//! Freeze stage - switches the store to precompiled and closes it.

use mapweave_core::{MapConfig, TypePair};

use crate::{
    BuildError,
    pipeline::{BuildContext, Diagnostic, Stage},
};

/// Freeze `config` and return the registered pairs that did not compile.
///
/// Freezing a frozen store changes nothing.
pub fn freeze(config: &mut MapConfig) -> Vec<TypePair> {
    config.freeze();
    config
        .pairs()
        .filter(|pair| !config.is_compiled(*pair))
        .collect()
}

/// Stage that freezes the store. Always the last stage.
pub struct FreezeStage;

impl Stage for FreezeStage {
    fn name(&self) -> &'static str {
        "freeze"
    }

    fn description(&self) -> &'static str {
        "Switch to the precompiled strategy and close the store"
    }

    fn skip_reason(&self, ctx: &BuildContext<'_>) -> Option<&'static str> {
        let requested = ctx.actions.freeze || ctx.options.freeze_configuration;
        (!requested).then_some("freeze not requested")
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        for pair in freeze(ctx.config) {
            ctx.report.diagnostics.push(
                Diagnostic::warning(self.name(), "pair left uncompiled; lookups will fail")
                    .about(pair.to_string()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mapweave_core::StrategyKind;

    use super::*;

    struct User;
    struct UserDto;
    struct Badge;

    #[test]
    fn test_freeze_reports_uncompiled_pairs() {
        let mut config = MapConfig::new();
        config.register(|_: &User| UserDto).expect("register");
        config.register_via::<User, UserDto, Badge>().expect("register");

        let broken = freeze(&mut config);

        assert!(config.is_frozen());
        assert_eq!(config.strategy(), StrategyKind::Precompiled);
        assert_eq!(broken, vec![TypePair::of::<User, Badge>()]);
    }

    #[test]
    fn test_freeze_twice_is_harmless() {
        let mut config = MapConfig::new();
        config.register(|_: &User| UserDto).expect("register");

        assert!(freeze(&mut config).is_empty());
        assert!(freeze(&mut config).is_empty());
        assert_eq!(config.compiled_count(), 1);
    }
}
