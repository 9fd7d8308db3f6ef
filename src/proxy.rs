use crate::context::{self, Shared, WeakContext};
use crate::errors::{ContextError, Result};
use crate::key::{Key, Space};
use crate::state::{self, Defaults};
use crate::storable::Storable;
use std::any::type_name;
use std::fmt;
use std::rc::Rc;

/// A lazy context that can also be read field by field.
///
/// Keys are reachable through the getter trait generated by
/// [`context_keys!`](crate::context_keys) (`ctx.user()` is `ctx.get::<User>()`)
/// and by name through [`property`](Self::property). The inherent
/// `get`/`set`/`reset` always win over a generated getter of the same name.
///
/// `set` reports whether the key was newly introduced. A key that holds a
/// default already counts as present.
pub struct ProxyContext<S: 'static> {
    shared: Shared<S>,
}

impl<S: 'static> ProxyContext<S> {
    pub fn new() -> Self {
        Self::with_defaults(Defaults::new())
    }

    pub fn with_defaults(defaults: Defaults<S>) -> Self {
        Self::from_shared(context::shared(defaults))
    }

    pub(crate) fn from_shared(shared: Shared<S>) -> Self {
        Self { shared }
    }

    pub fn get<K: Key<Space = S>>(&self) -> Option<K::Value> {
        context::read::<K>(&self.shared)
    }

    /// Replaces the entry for `K`; `true` if `K` had no entry before.
    pub fn set<K: Key<Space = S>>(&self, value: impl Into<Storable<K::Value>>) -> bool {
        self.shared.borrow_mut().insert::<K>(value.into())
    }

    pub fn set_thunk<K: Key<Space = S>>(&self, f: impl Fn() -> K::Value + 'static) -> bool {
        self.set::<K>(Storable::thunk(f))
    }

    pub fn unset<K: Key<Space = S>>(&self) -> bool {
        self.set::<K>(Storable::Unset)
    }

    pub fn contains<K: Key<Space = S>>(&self) -> bool {
        self.shared.borrow().contains(K::NAME)
    }

    pub fn reset(&self) {
        self.shared.borrow_mut().reset();
    }

    pub fn downgrade(&self) -> WeakContext<S> {
        WeakContext::from_shared(&self.shared)
    }

    /// Reads a stored key by name.
    ///
    /// Unknown and unset names read as `Ok(None)`. A name stored with a value
    /// type other than `T` is a [`ContextError::TypeMismatch`].
    pub fn property<T: Clone + 'static>(&self, name: &str) -> Result<Option<T>> {
        let Some(entry) = self.shared.borrow().entry(name) else {
            return Ok(None);
        };
        match state::downcast::<T>(&entry) {
            Some(storable) => Ok(storable.resolve()),
            None => Err(ContextError::TypeMismatch {
                key: name.to_string(),
                expected: type_name::<T>(),
            }),
        }
    }

    /// Names with an entry in the current state, sorted.
    pub fn keys(&self) -> Vec<&'static str> {
        self.shared.borrow().keys()
    }
}

impl<S: Space> ProxyContext<S> {
    /// Whether `name` is declared in the key space, set or not.
    pub fn has_property(&self, name: &str) -> bool {
        S::KEYS.iter().any(|key| *key == name)
    }
}

impl<S: 'static> Default for ProxyContext<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Clone for ProxyContext<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S: 'static> fmt::Debug for ProxyContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyContext")
            .field("keys", &self.keys())
            .finish()
    }
}
