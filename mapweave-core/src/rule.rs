//! Rules and the plans derived from them.

use std::{any::Any, fmt, sync::Arc};

use crate::{MapError, TypeKey, TypePair};

type ErasedConvert = dyn Fn(&dyn Any) -> Option<Box<dyn Any>> + Send + Sync;

/// A type-erased conversion closure for one pair.
#[derive(Clone)]
pub struct Converter(Arc<ErasedConvert>);

impl Converter {
    fn new<S, D, F>(f: F) -> Self
    where
        S: 'static,
        D: 'static,
        F: Fn(&S) -> D + Send + Sync + 'static,
    {
        Self(Arc::new(move |source: &dyn Any| {
            source
                .downcast_ref::<S>()
                .map(|value| Box::new(f(value)) as Box<dyn Any>)
        }))
    }

    /// Run the conversion on an erased source value.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Downcast`] if `source` is not the pair's source type.
    pub fn apply(&self, pair: TypePair, source: &dyn Any) -> Result<Box<dyn Any>, MapError> {
        (self.0)(source).ok_or(MapError::Downcast { pair })
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter(..)")
    }
}

#[derive(Debug, Clone)]
enum RuleKind {
    Convert(Converter),
    Via(TypeKey),
}

/// The registered description of how to convert one type pair.
#[derive(Debug, Clone)]
pub struct Rule {
    pair: TypePair,
    kind: RuleKind,
}

impl Rule {
    /// A rule that converts with a closure.
    pub fn convert<S, D, F>(f: F) -> Self
    where
        S: 'static,
        D: 'static,
        F: Fn(&S) -> D + Send + Sync + 'static,
    {
        Self {
            pair: TypePair::of::<S, D>(),
            kind: RuleKind::Convert(Converter::new(f)),
        }
    }

    /// A rule that converts `S -> M` and then `M -> D`, using whatever rules
    /// the configuration holds for those two steps.
    pub fn via<S: 'static, M: 'static, D: 'static>() -> Self {
        Self {
            pair: TypePair::of::<S, D>(),
            kind: RuleKind::Via(TypeKey::of::<M>()),
        }
    }

    /// The pair this rule converts.
    pub fn pair(&self) -> TypePair {
        self.pair
    }

    /// The intermediate type, for composed rules.
    pub fn intermediate(&self) -> Option<TypeKey> {
        match &self.kind {
            RuleKind::Convert(_) => None,
            RuleKind::Via(mid) => Some(*mid),
        }
    }

    pub(crate) fn converter(&self) -> Option<&Converter> {
        match &self.kind {
            RuleKind::Convert(converter) => Some(converter),
            RuleKind::Via(_) => None,
        }
    }
}

/// A validated rule graph for one pair, ready to be materialized by a
/// [`CompileStrategy`](crate::CompileStrategy).
///
/// Every step of a plan has a rule and the graph has no cycles.
#[derive(Debug, Clone)]
pub enum Plan {
    /// A single closure rule.
    Convert {
        pair: TypePair,
        converter: Converter,
    },
    /// A composed rule: `first` then `second`.
    Via {
        pair: TypePair,
        first: Box<Plan>,
        second: Box<Plan>,
    },
}

impl Plan {
    /// The pair this plan converts.
    pub fn pair(&self) -> TypePair {
        match self {
            Plan::Convert { pair, .. } | Plan::Via { pair, .. } => *pair,
        }
    }

    /// Number of closure rules the plan runs per conversion.
    pub fn depth(&self) -> usize {
        match self {
            Plan::Convert { .. } => 1,
            Plan::Via { first, second, .. } => first.depth() + second.depth(),
        }
    }
}
