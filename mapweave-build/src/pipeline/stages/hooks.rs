//! Hook stages - run the caller's before- and after-compile hooks.

use crate::{
    BuildError,
    pipeline::{BuildContext, Stage},
};

/// Where in the pipeline a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    /// After scanning, before precompiling.
    BeforeCompile,
    /// After precompiling, before freezing.
    AfterCompile,
}

/// Stage that invokes one of the [`BuildActions`](crate::BuildActions) hooks.
pub struct HookStage(pub HookPoint);

impl Stage for HookStage {
    fn name(&self) -> &'static str {
        match self.0 {
            HookPoint::BeforeCompile => "before-compile",
            HookPoint::AfterCompile => "after-compile",
        }
    }

    fn description(&self) -> &'static str {
        match self.0 {
            HookPoint::BeforeCompile => "Run the before-compile hook",
            HookPoint::AfterCompile => "Run the after-compile hook",
        }
    }

    fn skip_reason(&self, ctx: &BuildContext<'_>) -> Option<&'static str> {
        let hook = match self.0 {
            HookPoint::BeforeCompile => &ctx.actions.on_before_compile,
            HookPoint::AfterCompile => &ctx.actions.on_after_compile,
        };
        hook.is_none().then_some("no hook")
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let hook = match self.0 {
            HookPoint::BeforeCompile => ctx.actions.on_before_compile.as_mut(),
            HookPoint::AfterCompile => ctx.actions.on_after_compile.as_mut(),
        };
        let Some(hook) = hook else {
            return Ok(());
        };

        hook(ctx.config).map_err(|source| BuildError::Hook {
            hook: self.name(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use mapweave_core::{ConfigError, MapConfig};

    use super::*;
    use crate::{BuildActions, BuildOptions};

    struct A;
    struct B;

    #[test]
    fn test_hook_sees_and_mutates_store() {
        let mut config = MapConfig::new();
        let options = BuildOptions::new();
        let mut actions = BuildActions::new().after_compile(|config| config.register(|_: &A| B));
        let mut ctx = BuildContext::new(&mut config, &options, &mut actions);

        assert_eq!(HookStage(HookPoint::BeforeCompile).skip_reason(&ctx), Some("no hook"));
        assert_eq!(HookStage(HookPoint::AfterCompile).skip_reason(&ctx), None);

        HookStage(HookPoint::AfterCompile)
            .run(&mut ctx)
            .expect("hook should run");
        assert_eq!(ctx.config.len(), 1);
    }

    #[test]
    fn test_hook_error_names_hook() {
        let mut config = MapConfig::new();
        let options = BuildOptions::new();
        let mut actions = BuildActions::new()
            .before_compile(|_| Err(ConfigError::contribution("not today")));
        let mut ctx = BuildContext::new(&mut config, &options, &mut actions);

        let err = HookStage(HookPoint::BeforeCompile)
            .run(&mut ctx)
            .unwrap_err();
        assert!(matches!(err, BuildError::Hook { hook: "before-compile", .. }));
    }
}
