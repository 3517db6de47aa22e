//! Modules stage - runs every module contributor.

use crate::{
    BuildError,
    pipeline::{BuildContext, Stage},
};

/// Stage that runs the options' modules in registration order.
///
/// The first failing module aborts the build; later modules do not run.
pub struct ModulesStage;

impl Stage for ModulesStage {
    fn name(&self) -> &'static str {
        "modules"
    }

    fn description(&self) -> &'static str {
        "Run module contributors"
    }

    fn skip_reason(&self, ctx: &BuildContext<'_>) -> Option<&'static str> {
        ctx.options.modules.is_empty().then_some("no modules")
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        for module in &ctx.options.modules {
            let name = module.name().to_string();
            tracing::debug!(module = %name, "running module");
            module
                .register(ctx.config)
                .map_err(|source| BuildError::Module {
                    module: name.clone(),
                    source,
                })?;
            ctx.report.modules.push(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mapweave_core::{ConfigError, MapConfig, TypePair};

    use super::*;
    use crate::{BuildActions, BuildOptions, Module};

    struct A;
    struct B;

    struct Good;

    impl Module for Good {
        fn name(&self) -> &str {
            "good"
        }

        fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
            config.register(|_: &A| B)
        }
    }

    struct Broken;

    impl Module for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn register(&self, _config: &mut MapConfig) -> Result<(), ConfigError> {
            Err(ConfigError::contribution("no rules today"))
        }
    }

    struct Late;

    impl Module for Late {
        fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
            config.register(|_: &B| A)
        }
    }

    #[test]
    fn test_modules_run_in_order() {
        let mut config = MapConfig::new();
        let mut options = BuildOptions::new();
        options.module(Good).module(Late);
        let mut actions = BuildActions::new();
        let mut ctx = BuildContext::new(&mut config, &options, &mut actions);

        ModulesStage.run(&mut ctx).expect("modules should run");

        assert_eq!(ctx.report.modules.len(), 2);
        assert_eq!(ctx.report.modules[0], "good");
        assert!(ctx.report.modules[1].ends_with("Late"));
        assert!(ctx.config.contains(TypePair::of::<B, A>()));
    }

    #[test]
    fn test_failing_module_stops_later_modules() {
        let mut config = MapConfig::new();
        let mut options = BuildOptions::new();
        options.module(Broken).module(Late);
        let mut actions = BuildActions::new();
        let mut ctx = BuildContext::new(&mut config, &options, &mut actions);

        let err = ModulesStage.run(&mut ctx).unwrap_err();

        assert!(matches!(err, BuildError::Module { ref module, .. } if module == "broken"));
        assert!(ctx.config.is_empty());
    }

    #[test]
    fn test_skipped_without_modules() {
        let mut config = MapConfig::new();
        let options = BuildOptions::new();
        let mut actions = BuildActions::new();
        let ctx = BuildContext::new(&mut config, &options, &mut actions);

        assert_eq!(ModulesStage.skip_reason(&ctx), Some("no modules"));
    }
}
