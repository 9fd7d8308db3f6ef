use crate::context::{Context, WeakContext};
use crate::key::Key;
use crate::proxy::ProxyContext;
use crate::state::Defaults;
use crate::storable::Storable;
use std::fmt;

/// A context for derived values that track other keys.
///
/// Literals are frozen when `set` is called: an expression that reads other
/// keys is evaluated once, right then. Thunks are re-invoked on every `get`,
/// so a thunk that reads other keys sees their values at read time.
///
/// ```
/// use thunk_context::{context_keys, LazyContext};
///
/// context_keys! {
///     pub space Level: LevelFields {
///         number => Number: i64,
///         label => Label: String,
///     }
/// }
///
/// let ctx = LazyContext::<Level>::new();
/// let upstream = ctx.downgrade();
/// ctx.set_thunk::<Label>(move || {
///     format!("foo level {}", upstream.get::<Number>().unwrap_or(-1))
/// });
///
/// ctx.set::<Number>(1);
/// assert_eq!(ctx.get::<Label>().as_deref(), Some("foo level 1"));
/// ctx.set::<Number>(2);
/// assert_eq!(ctx.get::<Label>().as_deref(), Some("foo level 2"));
/// ```
///
/// A thunk whose value type is a future is invoked like any other; `get`
/// hands back the future unawaited.
pub struct LazyContext<S: 'static> {
    inner: Context<S>,
}

impl<S: 'static> LazyContext<S> {
    pub fn new() -> Self {
        Self::with_defaults(Defaults::new())
    }

    pub fn with_defaults(defaults: Defaults<S>) -> Self {
        Self {
            inner: Context::with_defaults(defaults),
        }
    }

    pub fn get<K: Key<Space = S>>(&self) -> Option<K::Value> {
        self.inner.get::<K>()
    }

    pub fn set<K: Key<Space = S>>(&self, value: impl Into<Storable<K::Value>>) {
        self.inner.set::<K>(value);
    }

    pub fn set_thunk<K: Key<Space = S>>(&self, f: impl Fn() -> K::Value + 'static) {
        self.inner.set_thunk::<K>(f);
    }

    /// Unsets `K` explicitly. Unlike a key that was never set, this also
    /// hides a default until the next `reset`.
    pub fn unset<K: Key<Space = S>>(&self) {
        self.inner.unset::<K>();
    }

    pub fn contains<K: Key<Space = S>>(&self) -> bool {
        self.inner.contains::<K>()
    }

    pub fn reset(&self) {
        self.inner.reset();
    }

    /// A handle for thunks that derive from sibling keys. Thunks should
    /// capture this rather than a clone of the context.
    pub fn downgrade(&self) -> WeakContext<S> {
        self.inner.downgrade()
    }

    /// The same state behind the property-style API.
    pub fn into_proxy(self) -> ProxyContext<S> {
        ProxyContext::from_shared(self.inner.shared)
    }
}

impl<S: 'static> Default for LazyContext<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Clone for LazyContext<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: 'static> fmt::Debug for LazyContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LazyContext").field(&self.inner).finish()
    }
}

impl<S: 'static> From<LazyContext<S>> for ProxyContext<S> {
    fn from(ctx: LazyContext<S>) -> Self {
        ctx.into_proxy()
    }
}
