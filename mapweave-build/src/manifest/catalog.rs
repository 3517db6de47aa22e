//! Name lookup for types referenced by a build manifest.

use indexmap::IndexSet;
use mapweave_core::{MapConfig, TypeKey};

use crate::Assembly;

/// Why a name did not resolve to a single type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No known type has this name.
    Unknown,
    /// Several known types share this short name; their full names.
    Ambiguous(Vec<&'static str>),
}

/// The set of types a manifest may name.
///
/// A name resolves if it is the full `type_name` of a known type, or the
/// short name (last path segment) of exactly one known type.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexSet<TypeKey>,
}

impl TypeCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `T` to the catalog.
    pub fn with<T: ?Sized + 'static>(mut self) -> Self {
        self.insert::<T>();
        self
    }

    /// Add `T` to the catalog.
    pub fn insert<T: ?Sized + 'static>(&mut self) -> &mut Self {
        self.insert_key(TypeKey::of::<T>())
    }

    /// Add a type key to the catalog.
    pub fn insert_key(&mut self, key: TypeKey) -> &mut Self {
        self.types.insert(key);
        self
    }

    /// Add every source and destination type of `config`'s rules.
    pub fn extend_from_config(&mut self, config: &MapConfig) -> &mut Self {
        for pair in config.pairs() {
            self.types.insert(pair.source);
            self.types.insert(pair.destination);
        }
        self
    }

    /// Add every type mentioned by rules that `assemblies` would contribute.
    ///
    /// Units are run against a scratch store; units that fail are ignored
    /// here and reported when the real build scans them.
    pub fn extend_from_assemblies<'a>(
        &mut self,
        assemblies: impl IntoIterator<Item = &'a Assembly>,
    ) -> &mut Self {
        let mut scratch = MapConfig::new();
        for assembly in assemblies {
            for unit in assembly.units() {
                if let Err(err) = unit.contribute(&mut scratch) {
                    tracing::trace!(unit = unit.type_name(), error = %err, "unit skipped while cataloguing");
                }
            }
        }
        self.extend_from_config(&scratch)
    }

    /// Number of known types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are known.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Known types, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.types.iter().copied()
    }

    /// Resolve a type name.
    pub fn resolve(&self, name: &str) -> Result<TypeKey, ResolveError> {
        let name = name.trim();
        if let Some(key) = self.types.iter().find(|key| key.name() == name) {
            return Ok(*key);
        }

        let matches: Vec<TypeKey> = self
            .types
            .iter()
            .filter(|key| key.short_name() == name)
            .copied()
            .collect();

        match matches.as_slice() {
            [] => Err(ResolveError::Unknown),
            [key] => Ok(*key),
            _ => Err(ResolveError::Ambiguous(
                matches.iter().map(TypeKey::name).collect(),
            )),
        }
    }
}
