//! Compilation strategies: how a [`Plan`] becomes a callable [`MapFn`].

use std::{any::Any, fmt, sync::Arc};

use serde::Serialize;

use crate::{MapConfig, MapError, Plan, TypePair};

type Invoke = dyn Fn(&MapConfig, &dyn Any) -> Result<Box<dyn Any>, MapError> + Send + Sync;

/// The two built-in ways of producing conversion functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Composed rules are re-resolved through the configuration on every call.
    #[default]
    Interpreted,
    /// Every step is resolved once, when the function is materialized.
    Precompiled,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Interpreted => write!(f, "interpreted"),
            StrategyKind::Precompiled => write!(f, "precompiled"),
        }
    }
}

/// A materialized conversion function for one pair.
///
/// Cloning is cheap; clones share the underlying closure.
#[derive(Clone)]
pub struct MapFn {
    pair: TypePair,
    kind: StrategyKind,
    invoke: Arc<Invoke>,
}

impl MapFn {
    /// Wrap a closure as the conversion function for `pair`.
    pub fn new<F>(pair: TypePair, kind: StrategyKind, invoke: F) -> Self
    where
        F: Fn(&MapConfig, &dyn Any) -> Result<Box<dyn Any>, MapError> + Send + Sync + 'static,
    {
        Self {
            pair,
            kind,
            invoke: Arc::new(invoke),
        }
    }

    /// The pair this function converts.
    pub fn pair(&self) -> TypePair {
        self.pair
    }

    /// The strategy that produced this function.
    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Convert an erased source value.
    ///
    /// `config` is consulted only by functions that resolve rules late.
    pub fn call(&self, config: &MapConfig, source: &dyn Any) -> Result<Box<dyn Any>, MapError> {
        (self.invoke)(config, source)
    }

    /// Convert a typed source value.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Downcast`] if `S`/`D` do not match this function's pair.
    pub fn invoke<S: 'static, D: 'static>(
        &self,
        config: &MapConfig,
        source: &S,
    ) -> Result<D, MapError> {
        let out = self.call(config, source)?;
        out.downcast::<D>()
            .map(|value| *value)
            .map_err(|_| MapError::Downcast { pair: self.pair })
    }
}

impl fmt::Debug for MapFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapFn")
            .field("pair", &self.pair)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The pluggable policy that turns a validated [`Plan`] into a [`MapFn`].
pub trait CompileStrategy: Send + Sync + fmt::Debug {
    /// Which built-in behaviour this strategy corresponds to.
    fn kind(&self) -> StrategyKind;

    /// Materialize the conversion function for `plan`.
    fn materialize(&self, plan: &Plan) -> MapFn;
}

/// Resolves composed rules through the configuration at call time, so a
/// held function observes later re-registrations of its steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreted;

impl CompileStrategy for Interpreted {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Interpreted
    }

    fn materialize(&self, plan: &Plan) -> MapFn {
        match plan {
            Plan::Convert { pair, converter } => {
                let (pair, converter) = (*pair, converter.clone());
                MapFn::new(pair, self.kind(), move |_, source| {
                    converter.apply(pair, source)
                })
            }
            Plan::Via {
                pair,
                first,
                second,
            } => {
                let (first, second) = (first.pair(), second.pair());
                MapFn::new(*pair, self.kind(), move |config, source| {
                    let mid = config.interpret(first, source)?;
                    config.interpret(second, &*mid)
                })
            }
        }
    }
}

/// Binds every step of the plan once; the resulting function never consults
/// the configuration again.
#[derive(Debug, Clone, Copy, Default)]
pub struct Precompiled;

impl Precompiled {
    fn bind(plan: &Plan) -> Arc<Invoke> {
        match plan {
            Plan::Convert { pair, converter } => {
                let (pair, converter) = (*pair, converter.clone());
                Arc::new(move |_: &MapConfig, source: &dyn Any| converter.apply(pair, source))
            }
            Plan::Via { first, second, .. } => {
                let first = Self::bind(first);
                let second = Self::bind(second);
                Arc::new(move |config: &MapConfig, source: &dyn Any| {
                    let mid = first(config, source)?;
                    second(config, &*mid)
                })
            }
        }
    }
}

impl CompileStrategy for Precompiled {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Precompiled
    }

    fn materialize(&self, plan: &Plan) -> MapFn {
        MapFn {
            pair: plan.pair(),
            kind: self.kind(),
            invoke: Self::bind(plan),
        }
    }
}
