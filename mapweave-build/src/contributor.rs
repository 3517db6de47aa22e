//! Contribution contracts.
//!
//! A contribution is anything that adds or overrides rules in a
//! [`MapConfig`]. Contributors do not know about each other; the pipeline
//! decides when each one runs.

use mapweave_core::{ConfigError, MapConfig};

/// A reusable, named bundle of rules.
///
/// Modules are listed explicitly in [`BuildOptions`](crate::BuildOptions)
/// and run first, in registration order. A module error aborts the build.
///
/// # Example
///
/// ```ignore
/// struct BillingModule;
///
/// impl Module for BillingModule {
///     fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
///         config.register(|invoice: &Invoice| InvoiceDto::from(invoice))?;
///         config.register_into::<Money, MoneyDto>()
///     }
/// }
/// ```
pub trait Module {
    /// The module name used in errors and build reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Register this module's rules.
    ///
    /// # Errors
    ///
    /// Any error aborts the build as an authoring error.
    fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError>;
}

/// A declarative registrar, discovered by scanning an assembly.
///
/// Declare one with [`register!`](crate::register!); the type must be
/// `Default` so the scanner can construct it.
pub trait Register {
    /// Register this registrar's rules.
    fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError>;
}

/// A destination type that describes how it is built from `S`.
///
/// Declare one closing with [`map_from!`](crate::map_from!). A type may
/// implement `MapFrom` for several sources; each declared closing is a
/// separate contribution.
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// struct UserCard { title: String }
///
/// impl MapFrom<User> for UserCard {
///     fn configure_mapping(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
///         config.register(|u: &User| UserCard { title: u.name.clone() })
///     }
/// }
///
/// mapweave_build::map_from!(User => UserCard);
/// ```
pub trait MapFrom<S: 'static>: 'static {
    /// Register the rule for `S -> Self`.
    fn configure_mapping(&self, config: &mut MapConfig) -> Result<(), ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named;

    impl Module for Named {
        fn register(&self, _config: &mut MapConfig) -> Result<(), ConfigError> {
            Ok(())
        }
    }

    struct Renamed;

    impl Module for Renamed {
        fn name(&self) -> &str {
            "renamed"
        }

        fn register(&self, _config: &mut MapConfig) -> Result<(), ConfigError> {
            Ok(())
        }
    }

    #[test]
    fn test_module_name_defaults_to_type_name() {
        assert_eq!(Named.name(), "mapweave_build::contributor::tests::Named");
        assert_eq!(Renamed.name(), "renamed");

        let boxed: Box<dyn Module> = Box::new(Named);
        assert_eq!(boxed.name(), "mapweave_build::contributor::tests::Named");
    }
}
