//! Entry points that build a configuration and hand back a [`Mapper`].

use std::sync::Arc;

use mapweave_core::{ConfigError, MapConfig, MapError};

use crate::{
    Assembly, BuildActions, BuildError, BuildOptions, BuildReport, MapperKind, Module, Pipeline,
};

/// A finished build.
#[derive(Debug)]
pub struct Built {
    /// The assembled store.
    pub config: Arc<MapConfig>,
    /// The mapper flavor requested by the build.
    pub kind: MapperKind,
    /// What the build did.
    pub report: BuildReport,
}

impl Built {
    /// A mapper over the built store.
    pub fn mapper(&self) -> Mapper {
        Mapper {
            config: Arc::clone(&self.config),
            kind: self.kind,
        }
    }
}

/// A cheap, clonable handle for running conversions against a built store.
#[derive(Debug, Clone)]
pub struct Mapper {
    config: Arc<MapConfig>,
    kind: MapperKind,
}

impl Mapper {
    /// Convert `source` into a `D`.
    pub fn map<S: 'static, D: 'static>(&self, source: &S) -> Result<D, MapError> {
        self.config.map(source)
    }

    /// The mapper flavor.
    pub fn kind(&self) -> MapperKind {
        self.kind
    }

    /// The underlying store.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}

/// Entry points for building a [`MapConfig`].
///
/// Each entry point creates (or takes) a store, runs the [`Pipeline`] over
/// it and returns the result as [`Built`].
///
/// # Example
///
/// ```ignore
/// let built = MapBuilder::with_options(|options| {
///     options
///         .module(UserModule)
///         .scan(mapweave_build::this_assembly!())
///         .precompile::<User, UserDto>();
///     options.freeze_configuration = true;
/// })?;
///
/// let dto: UserDto = built.mapper().map(&user)?;
/// ```
pub struct MapBuilder;

impl MapBuilder {
    /// Build from options filled in by `configure`.
    ///
    /// Scanning runs when assemblies are listed, precompilation when pairs
    /// are listed, and freezing when `freeze_configuration` is set.
    pub fn with_options<F>(configure: F) -> Result<Built, BuildError>
    where
        F: FnOnce(&mut BuildOptions),
    {
        let mut options = BuildOptions::new();
        configure(&mut options);
        Self::build(options)
    }

    /// Build from ready-made options.
    ///
    /// A fresh store gets the options' inline action first, then the pipeline
    /// runs with the actions the options imply.
    pub fn build(options: BuildOptions) -> Result<Built, BuildError> {
        let mut config = MapConfig::new();
        if let Some(configure) = &options.configure {
            configure(&mut config).map_err(|source| BuildError::Hook {
                hook: "configure",
                source,
            })?;
        }

        let mut actions = options.actions();
        let report = Pipeline::new().run(&mut config, &options, &mut actions)?;
        Ok(Built {
            config: Arc::new(config),
            kind: options.mapper,
            report,
        })
    }

    /// Build a fresh store configured by `configure_store`, with the actions
    /// filled in by `configure_actions`.
    pub fn with_config<C, A>(configure_store: C, configure_actions: A) -> Result<Built, BuildError>
    where
        C: FnOnce(&mut MapConfig) -> Result<(), ConfigError>,
        A: FnOnce(&mut BuildActions),
    {
        let mut config = MapConfig::new();
        configure_store(&mut config).map_err(|source| BuildError::Hook {
            hook: "configure",
            source,
        })?;
        Self::from_existing(config, configure_actions)
    }

    /// Run the pipeline over an existing store.
    ///
    /// Only the hooks and gates set by `configure_actions` apply; with no
    /// options there is nothing to scan or precompile, so in practice this
    /// runs the hooks and optionally freezes.
    pub fn from_existing<A>(mut config: MapConfig, configure_actions: A) -> Result<Built, BuildError>
    where
        A: FnOnce(&mut BuildActions),
    {
        let options = BuildOptions::new();
        let mut actions = BuildActions::new();
        configure_actions(&mut actions);

        let report = Pipeline::new().run(&mut config, &options, &mut actions)?;
        Ok(Built {
            config: Arc::new(config),
            kind: MapperKind::Service,
            report,
        })
    }

    /// Build a fresh store configured by `configure_store` and freeze it.
    pub fn frozen<C>(configure_store: C) -> Result<Built, BuildError>
    where
        C: FnOnce(&mut MapConfig) -> Result<(), ConfigError>,
    {
        Self::with_config(configure_store, |actions| actions.freeze = true)
    }

    /// Build from a single module.
    pub fn module<M: Module + Default + 'static>() -> Result<Built, BuildError> {
        Self::with_options(|options| {
            options.module(M::default());
        })
    }

    /// Build by scanning `assemblies`.
    pub fn scan<I>(assemblies: I) -> Result<Built, BuildError>
    where
        I: IntoIterator<Item = Assembly>,
    {
        Self::with_options(|options| {
            for assembly in assemblies {
                options.scan(assembly);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use mapweave_core::{StrategyKind, TypePair};

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Celsius(f64);
    #[derive(Debug, PartialEq)]
    struct Fahrenheit(f64);

    #[derive(Default)]
    struct TemperatureModule;

    impl Module for TemperatureModule {
        fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
            config.register(|c: &Celsius| Fahrenheit(c.0 * 9.0 / 5.0 + 32.0))
        }
    }

    #[test]
    fn test_with_options_derives_actions() {
        let built = MapBuilder::with_options(|options| {
            options
                .module(TemperatureModule)
                .precompile::<Celsius, Fahrenheit>();
            options.mapper = MapperKind::Plain;
        })
        .expect("build should succeed");

        assert!(!built.report.frozen);
        assert!(built.report.ran("precompile"));
        assert!(built.config.is_compiled(TypePair::of::<Celsius, Fahrenheit>()));
        assert_eq!(built.mapper().kind(), MapperKind::Plain);
    }

    #[test]
    fn test_inline_action_runs_before_modules() {
        let built = MapBuilder::with_options(|options| {
            options
                .configure(|config| config.register(|_: &Celsius| Fahrenheit(0.0)))
                .module(TemperatureModule);
        })
        .expect("build should succeed");

        let f: Fahrenheit = built.mapper().map(&Celsius(100.0)).expect("map");
        assert_eq!(f, Fahrenheit(212.0));
    }

    #[test]
    fn test_inline_action_error_is_reported_as_configure_hook() {
        let err = MapBuilder::with_options(|options| {
            options.configure(|_| Err(ConfigError::contribution("bad")));
        })
        .unwrap_err();

        assert!(matches!(err, BuildError::Hook { hook: "configure", .. }));
    }

    #[test]
    fn test_frozen_entry_point() {
        let built = MapBuilder::frozen(|config| {
            config.register(|c: &Celsius| Fahrenheit(c.0 * 9.0 / 5.0 + 32.0))
        })
        .expect("build should succeed");

        assert!(built.config.is_frozen());
        assert_eq!(built.config.strategy(), StrategyKind::Precompiled);
        assert_eq!(built.kind, MapperKind::Service);
    }

    #[test]
    fn test_module_entry_point() {
        let built = MapBuilder::module::<TemperatureModule>().expect("build should succeed");
        let f: Fahrenheit = built.mapper().map(&Celsius(0.0)).expect("map");
        assert_eq!(f, Fahrenheit(32.0));
    }

    #[test]
    fn test_from_existing_keeps_rules() {
        let mut config = MapConfig::new();
        config
            .register(|c: &Celsius| Fahrenheit(c.0))
            .expect("register");

        let built = MapBuilder::from_existing(config, |actions| actions.freeze = true)
            .expect("build should succeed");

        assert!(built.config.is_frozen());
        assert!(built.config.contains(TypePair::of::<Celsius, Fahrenheit>()));
    }
}
