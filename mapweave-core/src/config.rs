//! The mapping configuration store.

use std::{any::Any, collections::HashMap, fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    CompileError, CompileStrategy, ConfigError, Interpreted, MapError, MapFn, Plan, Precompiled,
    Rule, StrategyKind, TypePair,
};

/// The registry of conversion rules between type pairs.
///
/// A configuration starts open with the [`Interpreted`] strategy. Rules can
/// be registered and overridden (last write wins) until [`freeze`] switches
/// it to [`Precompiled`] and closes it. A frozen configuration never writes
/// to itself again, so `&MapConfig` can be shared freely across threads.
///
/// [`freeze`]: MapConfig::freeze
///
/// # Example
///
/// ```
/// use mapweave_core::MapConfig;
///
/// struct User { first: String, last: String }
/// struct UserDto { full_name: String }
///
/// let mut config = MapConfig::new();
/// config
///     .register(|u: &User| UserDto { full_name: format!("{} {}", u.first, u.last) })
///     .unwrap();
/// config.freeze();
///
/// let user = User { first: "Ada".into(), last: "Lovelace".into() };
/// let dto: UserDto = config.map(&user).unwrap();
/// assert_eq!(dto.full_name, "Ada Lovelace");
/// ```
#[derive(Clone)]
pub struct MapConfig {
    rules: IndexMap<TypePair, Rule>,
    cache: HashMap<TypePair, MapFn>,
    strategy: Arc<dyn CompileStrategy>,
    frozen: bool,
}

impl MapConfig {
    /// Create an empty, open configuration.
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
            cache: HashMap::new(),
            strategy: Arc::new(Interpreted),
            frozen: false,
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register (or replace) the rule for `S -> D` with a closure.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Frozen`] if the configuration is frozen.
    pub fn register<S, D, F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        S: 'static,
        D: 'static,
        F: Fn(&S) -> D + Send + Sync + 'static,
    {
        self.register_rule(Rule::convert(f))
    }

    /// Register (or replace) the rule for `S -> D` using `D: From<S>`.
    pub fn register_into<S, D>(&mut self) -> Result<(), ConfigError>
    where
        S: Clone + Into<D> + 'static,
        D: 'static,
    {
        self.register_rule(Rule::convert::<S, D, _>(|source: &S| source.clone().into()))
    }

    /// Register (or replace) the rule for `S -> D` as `S -> M -> D`.
    pub fn register_via<S: 'static, M: 'static, D: 'static>(&mut self) -> Result<(), ConfigError> {
        self.register_rule(Rule::via::<S, M, D>())
    }

    /// Register (or replace) a type-erased rule.
    ///
    /// Any successful registration drops every cached conversion function,
    /// since composed functions may have bound the replaced rule.
    pub fn register_rule(&mut self, rule: Rule) -> Result<(), ConfigError> {
        let pair = rule.pair();
        if self.frozen {
            return Err(ConfigError::Frozen { pair });
        }

        if self.rules.insert(pair, rule).is_some() {
            tracing::debug!(%pair, "replaced rule");
        } else {
            tracing::trace!(%pair, "registered rule");
        }
        self.cache.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Whether a rule is registered for `pair`.
    pub fn contains(&self, pair: TypePair) -> bool {
        self.rules.contains_key(&pair)
    }

    /// The rule registered for `pair`, if any.
    pub fn rule(&self, pair: TypePair) -> Option<&Rule> {
        self.rules.get(&pair)
    }

    /// Registered pairs, in first-registration order.
    pub fn pairs(&self) -> impl Iterator<Item = TypePair> + '_ {
        self.rules.keys().copied()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether a conversion function for `pair` is cached.
    pub fn is_compiled(&self, pair: TypePair) -> bool {
        self.cache.contains_key(&pair)
    }

    /// Number of cached conversion functions.
    pub fn compiled_count(&self) -> usize {
        self.cache.len()
    }

    /// Whether the configuration has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // ------------------------------------------------------------------
    // Strategy
    // ------------------------------------------------------------------

    /// The current compilation strategy.
    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Replace the compilation strategy, dropping every cached function.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FrozenStrategy`] if the configuration is frozen.
    pub fn set_strategy(&mut self, strategy: impl CompileStrategy + 'static) -> Result<(), ConfigError> {
        if self.frozen {
            return Err(ConfigError::FrozenStrategy);
        }
        tracing::debug!(from = %self.strategy.kind(), to = %strategy.kind(), "switching strategy");
        self.strategy = Arc::new(strategy);
        self.cache.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Compilation
    // ------------------------------------------------------------------

    /// Materialize and cache the conversion function for `pair`.
    ///
    /// On a frozen configuration nothing is written: a cached function is
    /// returned as-is and anything else is compiled on the fly.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the pair (or one of its steps) has no
    /// rule, or if its composed rules form a cycle.
    pub fn get_or_compile(&mut self, pair: TypePair) -> Result<MapFn, CompileError> {
        if let Some(function) = self.cache.get(&pair) {
            return Ok(function.clone());
        }

        let function = self.materialize(pair)?;
        if !self.frozen {
            tracing::debug!(%pair, strategy = %function.kind(), "compiled");
            self.cache.insert(pair, function.clone());
        }
        Ok(function)
    }

    /// The conversion function for `pair`: the cached one, or a fresh,
    /// uncached one.
    pub fn map_fn(&self, pair: TypePair) -> Result<MapFn, CompileError> {
        match self.cache.get(&pair) {
            Some(function) => Ok(function.clone()),
            None => self.materialize(pair),
        }
    }

    /// Convert `source` into a `D`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Compile`] if no conversion for `S -> D` can be
    /// materialized.
    pub fn map<S: 'static, D: 'static>(&self, source: &S) -> Result<D, MapError> {
        self.map_fn(TypePair::of::<S, D>())?.invoke(self, source)
    }

    /// Freeze the configuration.
    ///
    /// Switches to the [`Precompiled`] strategy, materializes every registered
    /// pair under it and rejects further registrations. Pairs that fail to
    /// compile are left uncached and keep reporting their error on lookup.
    /// Freezing a frozen configuration does nothing.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }

        self.strategy = Arc::new(Precompiled);
        self.cache.clear();

        let pairs: Vec<TypePair> = self.pairs().collect();
        for pair in pairs {
            match self.materialize(pair) {
                Ok(function) => {
                    self.cache.insert(pair, function);
                }
                Err(err) => tracing::warn!(%pair, error = %err, "pair left uncompiled by freeze"),
            }
        }

        self.frozen = true;
        tracing::debug!(
            rules = self.rules.len(),
            compiled = self.cache.len(),
            "configuration frozen"
        );
    }

    fn materialize(&self, pair: TypePair) -> Result<MapFn, CompileError> {
        let plan = self.plan(pair)?;
        Ok(self.strategy.materialize(&plan))
    }

    /// Run `pair` with late rule resolution. Used by interpreted functions.
    pub(crate) fn interpret(&self, pair: TypePair, source: &dyn Any) -> Result<Box<dyn Any>, MapError> {
        let plan = self.plan(pair)?;
        Interpreted.materialize(&plan).call(self, source)
    }

    /// Build and validate the rule graph for `pair`.
    pub fn plan(&self, pair: TypePair) -> Result<Plan, CompileError> {
        let mut stack = Vec::new();
        self.plan_inner(pair, &mut stack)
    }

    fn plan_inner(&self, pair: TypePair, stack: &mut Vec<TypePair>) -> Result<Plan, CompileError> {
        if let Some(start) = stack.iter().position(|seen| *seen == pair) {
            let mut path = stack[start..].to_vec();
            path.push(pair);
            return Err(CompileError::Cycle { pair, path });
        }

        let rule = self
            .rules
            .get(&pair)
            .ok_or(CompileError::MissingRule { pair })?;

        if let Some(converter) = rule.converter() {
            return Ok(Plan::Convert {
                pair,
                converter: converter.clone(),
            });
        }

        let Some(mid) = rule.intermediate() else {
            return Err(CompileError::MissingRule { pair });
        };

        stack.push(pair);
        let steps = self
            .plan_inner(TypePair::new(pair.source, mid), stack)
            .and_then(|first| {
                let second = self.plan_inner(TypePair::new(mid, pair.destination), stack)?;
                Ok((first, second))
            });
        stack.pop();

        let (first, second) = steps.map_err(|source| CompileError::Step {
            pair,
            source: Box::new(source),
        })?;
        Ok(Plan::Via {
            pair,
            first: Box::new(first),
            second: Box::new(second),
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapConfig")
            .field("pairs", &self.rules.keys().collect::<Vec<_>>())
            .field("compiled", &self.cache.len())
            .field("strategy", &self.strategy.kind())
            .field("frozen", &self.frozen)
            .finish()
    }
}
