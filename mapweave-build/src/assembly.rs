//! Assemblies and link-time discovery of registrars.
//!
//! Registrars and [`MapFrom`] closings submit a [`Unit`] to a process-wide
//! list with [`register!`](crate::register!) and
//! [`map_from!`](crate::map_from!). Each unit is tagged with the name of
//! the assembly it belongs to (by default the declaring crate), and the
//! scanner enumerates the units of the assemblies it is given.
//!
//! ```ignore
//! #[derive(Default)]
//! struct UserMappings;
//!
//! impl Register for UserMappings {
//!     fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
//!         config.register(|u: &User| UserDto::from(u))
//!     }
//! }
//!
//! mapweave_build::register!(UserMappings);
//!
//! let mut options = BuildOptions::new();
//! options.scan(mapweave_build::this_assembly!());
//! ```

use std::{borrow::Cow, collections::BTreeSet, fmt};

use mapweave_core::{ConfigError, MapConfig, TypeKey};
use serde::Serialize;

use crate::{MapFrom, Register};

type Contribute = fn(&mut MapConfig) -> Result<(), ConfigError>;

/// A named unit of discovery. Two assemblies are the same if their names are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Assembly(Cow<'static, str>);

impl Assembly {
    /// The assembly with the given name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The assembly name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Units submitted under this assembly, in unspecified order.
    pub fn units(&self) -> impl Iterator<Item = &'static Unit> + '_ {
        inventory::iter::<Unit>
            .into_iter()
            .filter(move |unit| unit.assembly == self.name())
    }

    /// Every assembly that has at least one unit linked into the process.
    pub fn linked() -> Vec<Assembly> {
        inventory::iter::<Unit>
            .into_iter()
            .map(|unit| unit.assembly)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Assembly::named)
            .collect()
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a discovered unit contributes.
#[derive(Clone, Copy)]
pub enum UnitKind {
    /// A [`Register`] implementation.
    Registrar,
    /// One `MapFrom<S>` closing of a destination type.
    MapFrom {
        /// The closing's source type.
        source: fn() -> TypeKey,
        /// The implementing destination type.
        destination: fn() -> TypeKey,
    },
}

impl fmt::Debug for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Registrar => f.write_str("Registrar"),
            UnitKind::MapFrom {
                source,
                destination,
            } => f
                .debug_struct("MapFrom")
                .field("source", &source())
                .field("destination", &destination())
                .finish(),
        }
    }
}

/// A discoverable contributor, submitted at link time.
///
/// Construct units with [`register!`](crate::register!) and
/// [`map_from!`](crate::map_from!) rather than directly.
pub struct Unit {
    assembly: &'static str,
    type_name: fn() -> &'static str,
    kind: UnitKind,
    contribute: Contribute,
}

inventory::collect!(Unit);

impl Unit {
    /// A unit for the declarative registrar `T`.
    pub const fn registrar<T: Register + Default>(assembly: &'static str) -> Self {
        Self {
            assembly,
            type_name: std::any::type_name::<T>,
            kind: UnitKind::Registrar,
            contribute: run_registrar::<T>,
        }
    }

    /// A unit for the `MapFrom<S>` closing of `D`.
    pub const fn map_from<S: 'static, D: MapFrom<S> + Default>(assembly: &'static str) -> Self {
        Self {
            assembly,
            type_name: std::any::type_name::<D>,
            kind: UnitKind::MapFrom {
                source: TypeKey::of::<S>,
                destination: TypeKey::of::<D>,
            },
            contribute: run_map_from::<S, D>,
        }
    }

    /// The assembly this unit belongs to.
    pub fn assembly(&self) -> &'static str {
        self.assembly
    }

    /// The implementing type.
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// What the unit contributes.
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Construct the implementing type and run its registration method.
    pub fn contribute(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
        (self.contribute)(config)
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("assembly", &self.assembly)
            .field("type_name", &self.type_name())
            .field("kind", &self.kind)
            .finish()
    }
}

fn run_registrar<T: Register + Default>(config: &mut MapConfig) -> Result<(), ConfigError> {
    T::default().register(config)
}

fn run_map_from<S: 'static, D: MapFrom<S> + Default>(
    config: &mut MapConfig,
) -> Result<(), ConfigError> {
    <D as MapFrom<S>>::configure_mapping(&D::default(), config)
}

/// Submit a [`Register`] implementation for assembly scanning.
///
/// The unit belongs to the calling crate's assembly unless one is named.
///
/// ```ignore
/// mapweave_build::register!(UserMappings);
/// mapweave_build::register!(LegacyMappings, assembly = "legacy");
/// ```
#[macro_export]
macro_rules! register {
    ($ty:ty) => {
        $crate::register!($ty, assembly = ::core::env!("CARGO_CRATE_NAME"));
    };
    ($ty:ty, assembly = $assembly:expr) => {
        $crate::__private::inventory::submit! {
            $crate::Unit::registrar::<$ty>($assembly)
        }
    };
}

/// Submit one `MapFrom<Source>` closing of a destination type for assembly
/// scanning.
///
/// ```ignore
/// mapweave_build::map_from!(User => UserCard);
/// mapweave_build::map_from!(UserDto => UserCard, assembly = "cards");
/// ```
#[macro_export]
macro_rules! map_from {
    ($source:ty => $destination:ty) => {
        $crate::map_from!($source => $destination, assembly = ::core::env!("CARGO_CRATE_NAME"));
    };
    ($source:ty => $destination:ty, assembly = $assembly:expr) => {
        $crate::__private::inventory::submit! {
            $crate::Unit::map_from::<$source, $destination>($assembly)
        }
    };
}

/// The [`Assembly`] of the calling crate.
#[macro_export]
macro_rules! this_assembly {
    () => {
        $crate::Assembly::named(::core::env!("CARGO_CRATE_NAME"))
    };
}
