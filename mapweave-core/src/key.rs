//! Type identities used as registry keys.

use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Serialize, Serializer};

/// A runtime identity for a Rust type.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// diagnostics and for resolving types by name from a build manifest.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name (e.g. `app::models::User`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type name without its module path (e.g. `User`).
    ///
    /// Generic arguments are kept as written, so `Vec<app::User>` stays
    /// `Vec<app::User>`. Tuple, array and slice names are returned whole.
    pub fn short_name(&self) -> &'static str {
        if self.name.starts_with(['(', '[']) {
            return self.name;
        }
        let head = match self.name.find('<') {
            Some(idx) => &self.name[..idx],
            None => self.name,
        };
        match head.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for TypeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// An ordered (source, destination) pair identifying one conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypePair {
    /// The type being converted from.
    pub source: TypeKey,
    /// The type being converted to.
    pub destination: TypeKey,
}

impl TypePair {
    /// Create a pair from two keys.
    pub fn new(source: TypeKey, destination: TypeKey) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// The pair `S -> D`.
    pub fn of<S: 'static, D: 'static>() -> Self {
        Self::new(TypeKey::of::<S>(), TypeKey::of::<D>())
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct Source;
    struct Destination;

    #[test]
    fn test_key_equality_uses_type_id() {
        assert_eq!(TypeKey::of::<Source>(), TypeKey::of::<Source>());
        assert_ne!(TypeKey::of::<Source>(), TypeKey::of::<Destination>());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(TypeKey::of::<Source>().short_name(), "Source");
        assert_eq!(TypeKey::of::<u32>().short_name(), "u32");
        assert_eq!(TypeKey::of::<Vec<Source>>().short_name(), "Vec<mapweave_core::key::tests::Source>");
    }

    #[test]
    fn test_short_name_keeps_tuples_and_arrays_whole() {
        let tuple = TypeKey::of::<(Source, u32)>();
        assert_eq!(tuple.short_name(), tuple.name());

        let array = TypeKey::of::<[Source; 2]>();
        assert_eq!(array.short_name(), array.name());
    }

    #[test]
    fn test_pair_is_ordered() {
        let forward = TypePair::of::<Source, Destination>();
        let backward = TypePair::of::<Destination, Source>();
        assert_ne!(forward, backward);

        let set: HashSet<_> = [forward, forward, backward].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_pair_display() {
        let pair = TypePair::of::<u8, String>();
        assert_eq!(pair.to_string(), "u8 -> alloc::string::String");
    }
}
