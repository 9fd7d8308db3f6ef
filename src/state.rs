use crate::key::Key;
use crate::storable::{Storable, Thunk};
use itertools::Itertools;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// A type-erased `Rc<Storable<K::Value>>`. Cloning it is a shallow copy.
pub(crate) type Entry = Rc<dyn Any>;

type Slots = HashMap<&'static str, Entry>;

/// Baseline values for a context, captured once at construction.
///
/// ```
/// use thunk_context::{context_keys, Defaults, LazyContext};
///
/// context_keys! {
///     pub space Env: EnvFields {
///         region => Region: String,
///         retries => Retries: u8,
///     }
/// }
///
/// let ctx = LazyContext::with_defaults(
///     Defaults::<Env>::new()
///         .literal::<Region>("eu-west-1".to_string())
///         .thunk::<Retries>(|| 3),
/// );
/// assert_eq!(ctx.get::<Retries>(), Some(3));
/// ```
pub struct Defaults<S> {
    slots: Slots,
    _space: PhantomData<fn() -> S>,
}

impl<S: 'static> Defaults<S> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            _space: PhantomData,
        }
    }

    pub fn storable<K>(mut self, value: Storable<K::Value>) -> Self
    where
        K: Key<Space = S>,
    {
        self.slots.insert(K::NAME, Rc::new(value));
        self
    }

    pub fn literal<K>(self, value: K::Value) -> Self
    where
        K: Key<Space = S>,
    {
        self.storable::<K>(Storable::Literal(value))
    }

    pub fn thunk<K: Key<Space = S>>(self, f: impl Fn() -> K::Value + 'static) -> Self {
        let thunk: Thunk<K::Value> = Rc::new(f);
        self.storable::<K>(Storable::Thunk(thunk))
    }

    pub fn unset<K>(self) -> Self
    where
        K: Key<Space = S>,
    {
        self.storable::<K>(Storable::Unset)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<S: 'static> Default for Defaults<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Defaults<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Defaults")
            .field("keys", &self.slots.keys().sorted().collect::<Vec<_>>())
            .finish()
    }
}

/// The state machine behind every context flavour: frozen defaults plus a
/// mutable shallow copy of them.
pub(crate) struct State<S> {
    defaults: Rc<Slots>,
    current: Slots,
    _space: PhantomData<fn() -> S>,
}

impl<S: 'static> State<S> {
    pub(crate) fn new(defaults: Defaults<S>) -> Self {
        tracing::debug!(
            space = type_name::<S>(),
            defaults = defaults.len(),
            "context created"
        );
        let defaults = Rc::new(defaults.slots);
        Self {
            current: (*defaults).clone(),
            defaults,
            _space: PhantomData,
        }
    }

    /// The raw entry for `name`. Callers drop their borrow of the state
    /// before resolving it so thunks may touch the context again.
    pub(crate) fn entry(&self, name: &str) -> Option<Entry> {
        self.current.get(name).cloned()
    }

    /// Replaces the entry for `K`, returning `true` if the key had no entry.
    pub(crate) fn insert<K>(&mut self, value: Storable<K::Value>) -> bool
    where
        K: Key<Space = S>,
    {
        tracing::trace!(
            key = K::NAME,
            thunk = value.is_thunk(),
            unset = value.is_unset(),
            "set"
        );
        self.current.insert(K::NAME, Rc::new(value)).is_none()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.current.contains_key(name)
    }

    pub(crate) fn reset(&mut self) {
        tracing::debug!(
            space = type_name::<S>(),
            overrides = self.overrides(),
            "reset"
        );
        self.current = (*self.defaults).clone();
    }

    /// Entries that are not the default entry captured at construction.
    pub(crate) fn overrides(&self) -> usize {
        self.current
            .iter()
            .filter(|(name, entry)| {
                self.defaults
                    .get(*name)
                    .map_or(true, |default| !Rc::ptr_eq(default, entry))
            })
            .count()
    }

    pub(crate) fn keys(&self) -> Vec<&'static str> {
        self.current.keys().copied().sorted().collect()
    }
}

/// Downcasts an entry to the storable of value type `T`.
pub(crate) fn downcast<T: 'static>(entry: &Entry) -> Option<&Storable<T>> {
    let any: &dyn Any = &**entry;
    any.downcast_ref::<Storable<T>>()
}

/// Resolves `K` from an entry; a mismatched entry reads as absent.
pub(crate) fn resolve<K: Key>(entry: Option<Entry>) -> Option<K::Value> {
    let entry = entry?;
    match downcast::<K::Value>(&entry) {
        Some(storable) => {
            tracing::trace!(key = K::NAME, thunk = storable.is_thunk(), "get");
            storable.resolve()
        }
        None => {
            tracing::warn!(
                key = K::NAME,
                expected = type_name::<K::Value>(),
                "stored entry has a different value type"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    crate::context_keys! {
        space Probe: ProbeFields {
            alpha => Alpha: u32,
            beta => Beta: String,
        }
    }

    // Same name as `Alpha`, different value type.
    enum Impostor {}
    impl Key for Impostor {
        type Space = Probe;
        type Value = String;
        const NAME: &'static str = "alpha";
    }

    #[test]
    fn insert_reports_new_keys() {
        let mut state = State::new(Defaults::<Probe>::new().literal::<Alpha>(1));
        assert!(!state.insert::<Alpha>(Storable::Literal(2)));
        assert!(state.insert::<Beta>(Storable::Unset));
        assert_eq!(state.keys(), vec!["alpha", "beta"]);
    }

    #[test]
    fn reset_restores_the_frozen_defaults() {
        let mut state = State::new(Defaults::<Probe>::new().literal::<Alpha>(1));
        state.insert::<Alpha>(Storable::Literal(9));
        state.insert::<Beta>(Storable::Literal("x".into()));
        state.reset();
        assert_eq!(resolve::<Alpha>(state.entry("alpha")), Some(1));
        assert!(!state.contains("beta"));
    }

    #[test]
    fn overrides_excludes_untouched_defaults() {
        let mut state = State::new(
            Defaults::<Probe>::new()
                .literal::<Alpha>(1)
                .literal::<Beta>("b".into()),
        );
        assert_eq!(state.overrides(), 0);

        state.insert::<Alpha>(Storable::Literal(2));
        assert_eq!(state.overrides(), 1);

        state.reset();
        assert_eq!(state.overrides(), 0);
    }

    #[test]
    fn overrides_counts_keys_without_a_default() {
        let mut state = State::new(Defaults::<Probe>::new());
        state.insert::<Beta>(Storable::Unset);
        assert_eq!(state.overrides(), 1);
    }

    #[test]
    fn mismatched_entry_reads_as_absent() {
        let mut state = State::new(Defaults::<Probe>::new());
        state.insert::<Alpha>(Storable::Literal(5));
        assert_eq!(resolve::<Impostor>(state.entry("alpha")), None);
        assert_eq!(resolve::<Alpha>(state.entry("alpha")), Some(5));
    }

    #[test]
    fn defaults_debug_lists_sorted_keys() {
        let d = Defaults::<Probe>::new()
            .unset::<Beta>()
            .thunk::<Alpha>(|| 1);
        assert_eq!(d.len(), 2);
        assert_eq!(format!("{d:?}"), r#"Defaults { keys: ["alpha", "beta"] }"#);
    }
}
